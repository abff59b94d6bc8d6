//! Via-point generation.
//!
//! A via-point is where the drive ends and the walk begins. Candidates are
//! sampled on concentric rings around the destination, sized by how far the
//! traveller is willing to walk.

use crate::spatial::{Location, haversine_m, ring};

/// Sample via-points on rings around `destination`.
///
/// One ring per entry of `fractions`, each of radius `radius_m * fraction`
/// with `samples` points. Points are labelled with their ring radius.
pub fn via_points(
    destination: &Location,
    radius_m: f64,
    fractions: &[f64],
    samples: usize,
) -> Vec<Location> {
    fractions
        .iter()
        .flat_map(|fraction| {
            let ring_radius = radius_m * fraction;
            ring(destination.coords(), ring_radius, samples)
                .into_iter()
                .map(move |point| {
                    Location::from(point)
                        .with_address(format!("Parking spot {ring_radius:.0}m from destination"))
                })
        })
        .collect()
}

/// The `n` points closest to `origin` by great-circle distance, nearest
/// first.
pub fn nearest_to(origin: &Location, points: Vec<Location>, n: usize) -> Vec<Location> {
    let mut by_distance: Vec<(f64, Location)> = points
        .into_iter()
        .map(|p| (haversine_m(origin.coords(), p.coords()), p))
        .collect();
    by_distance.sort_by(|a, b| a.0.total_cmp(&b.0));
    by_distance.into_iter().take(n).map(|(_, p)| p).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn destination() -> Location {
        Location::new(45.5088, -73.5878)
    }

    #[test]
    fn two_rings_of_twenty() {
        let points = via_points(&destination(), 800.0, &[0.9, 1.0], 20);
        assert_eq!(points.len(), 40);

        let inner = haversine_m(destination().coords(), points[0].coords());
        let outer = haversine_m(destination().coords(), points[20].coords());
        assert!((inner - 720.0).abs() < 15.0, "inner ring at {inner}");
        assert!((outer - 800.0).abs() < 15.0, "outer ring at {outer}");
    }

    #[test]
    fn points_are_labelled() {
        let points = via_points(&destination(), 800.0, &[0.9, 1.0], 4);
        assert_eq!(
            points[0].address.as_deref(),
            Some("Parking spot 720m from destination")
        );
        assert_eq!(
            points[4].address.as_deref(),
            Some("Parking spot 800m from destination")
        );
    }

    #[test]
    fn nearest_keeps_closest_in_order() {
        let origin = Location::new(45.60, -73.5878);
        let points = via_points(&destination(), 800.0, &[1.0], 20);
        let nearest = nearest_to(&origin, points, 5);

        assert_eq!(nearest.len(), 5);
        // Origin is due north, so the northernmost ring point wins
        let north = (destination().latitude + 800.0 / 111_320.0, destination().longitude);
        assert!(haversine_m(nearest[0].coords(), north) < 1.0);
        for pair in nearest.windows(2) {
            assert!(
                haversine_m(origin.coords(), pair[0].coords())
                    <= haversine_m(origin.coords(), pair[1].coords())
            );
        }
    }

    #[test]
    fn nearest_with_fewer_points_than_requested() {
        let points = vec![Location::new(1.0, 1.0), Location::new(2.0, 2.0)];
        assert_eq!(nearest_to(&Location::new(0.0, 0.0), points, 5).len(), 2);
    }
}
