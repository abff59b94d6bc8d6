use std::collections::HashMap;
use std::error::Error;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use trip_planner::cache::{CacheConfig, CachedEstimator};
use trip_planner::config::AppConfig;
use trip_planner::domain::{NodeId, Route, parse_id_str};
use trip_planner::estimator::{
    FallbackEstimator, OsrmConfig, OsrmEstimator, OsrmProfile, StraightLineEstimator,
};
use trip_planner::graph::{Graph, load_graphs_from_directory};
use trip_planner::gtfs::SharedGtfsIndex;
use trip_planner::planner::{Composer, ComposerConfig, RoutePreferences};
use trip_planner::spatial::Location;

const USAGE: &str = "usage:
  trip-planner route <graph> <start-node> <goal-node>
  trip-planner drive-walk <origin-lat> <origin-lon> <dest-lat> <dest-lon> [max-walk-mins]";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    let graphs: HashMap<String, Arc<Graph>> = match &config.graphs_dir {
        Some(dir) => load_graphs_from_directory(dir)?
            .into_iter()
            .map(|(name, graph)| (name, Arc::new(graph)))
            .collect(),
        None => {
            warn!("GRAPHS_DIR not set, no graphs loaded");
            HashMap::new()
        }
    };
    for (name, graph) in &graphs {
        info!(
            name = %name,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "graph ready"
        );
    }

    if let Some(dir) = &config.gtfs_dir {
        let gtfs = SharedGtfsIndex::new(dir);
        let index = gtfs.get_or_load()?;
        info!(stops = index.stop_count(), trips = index.trip_count(), "GTFS ready");
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None => Ok(()),
        Some("route") => run_route(&graphs, &args[1..]),
        Some("drive-walk") => run_drive_walk(&config, &args[1..]).await,
        Some(_) => {
            eprintln!("{USAGE}");
            Err("unknown command".into())
        }
    }
}

fn run_route(
    graphs: &HashMap<String, Arc<Graph>>,
    args: &[String],
) -> Result<(), Box<dyn Error>> {
    let [name, start, goal] = args else {
        eprintln!("{USAGE}");
        return Err("route takes three arguments".into());
    };
    let graph = graphs
        .get(name)
        .ok_or_else(|| format!("no graph named {name}"))?;

    let (start, goal) = (NodeId(parse_id_str(start)), NodeId(parse_id_str(goal)));
    let (path, seconds) = graph.astar_with_cost(start, goal)?;

    println!("{} nodes, {:.0} s", path.len(), seconds);
    let ids: Vec<String> = path.iter().map(NodeId::to_string).collect();
    println!("{}", ids.join(" -> "));
    Ok(())
}

async fn run_drive_walk(config: &AppConfig, args: &[String]) -> Result<(), Box<dyn Error>> {
    if args.len() < 4 {
        eprintln!("{USAGE}");
        return Err("drive-walk takes four coordinates".into());
    }
    let coord = |i: usize| args[i].parse::<f64>();
    let origin = Location::new(coord(0)?, coord(1)?);
    let destination = Location::new(coord(2)?, coord(3)?);
    let preferences = RoutePreferences {
        max_walk_minutes: args.get(4).map(|s| s.parse()).transpose()?,
        preferred_walk_minutes: None,
    };

    let osrm = |profile| {
        OsrmConfig::new(profile)
            .with_base_url(config.osrm_base_url.clone())
            .with_timeout(config.osrm_timeout_secs)
            .with_max_concurrent(config.planner_concurrency)
    };
    let cache_config = CacheConfig::default();
    let driving = CachedEstimator::new(
        FallbackEstimator::new(
            OsrmEstimator::new(osrm(OsrmProfile::Driving))?,
            StraightLineEstimator::driving(),
        ),
        &cache_config,
    );
    let walking = CachedEstimator::new(
        FallbackEstimator::new(
            OsrmEstimator::new(osrm(OsrmProfile::Foot))?,
            StraightLineEstimator::walking(),
        ),
        &cache_config,
    );

    let composer_config = ComposerConfig::default()
        .with_concurrency(config.planner_concurrency)
        .with_leg_timeout(config.osrm_timeout_secs);
    let composer = Composer::new(&driving, &walking, &composer_config);

    let routes = composer
        .compose_drive_walk(&origin, &destination, &preferences)
        .await?;
    for route in &routes {
        print_route(route);
    }
    Ok(())
}

fn print_route(route: &Route) {
    println!(
        "{}: {} min, {:.0} m",
        route.id,
        route.total_duration().num_minutes(),
        route.distance_m()
    );
    for segment in route.segments() {
        let text = segment.instructions.as_deref().unwrap_or("");
        println!(
            "  [{}] {} min  {}",
            segment.mode,
            segment.duration.num_minutes(),
            text
        );
    }
}
