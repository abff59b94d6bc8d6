//! Lazily loaded, shareable GTFS index.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;

use super::{GtfsError, GtfsIndex};

/// A handle that loads a feed on first use and hands out the same
/// [`GtfsIndex`] afterwards.
///
/// Concurrent first callers block until a single load finishes. A failed load
/// is not remembered, so the next call tries again.
#[derive(Debug)]
pub struct SharedGtfsIndex {
    dir: PathBuf,
    cell: OnceCell<Arc<GtfsIndex>>,
}

impl SharedGtfsIndex {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cell: OnceCell::new(),
        }
    }

    /// Wrap an index that has already been built.
    pub fn preloaded(dir: impl Into<PathBuf>, index: GtfsIndex) -> Self {
        Self {
            dir: dir.into(),
            cell: OnceCell::with_value(Arc::new(index)),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn get_or_load(&self) -> Result<Arc<GtfsIndex>, GtfsError> {
        self.cell
            .get_or_try_init(|| GtfsIndex::load(&self.dir).map(Arc::new))
            .cloned()
    }

    /// The index, if it has been loaded.
    pub fn get(&self) -> Option<Arc<GtfsIndex>> {
        self.cell.get().cloned()
    }
}
