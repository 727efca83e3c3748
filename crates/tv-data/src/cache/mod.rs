//! Derived-data caching
//!
//! Lives inside a [`crate::session::Dataset`], so replacing the dataset drops
//! every cached result with it.

use std::sync::Arc;
use parking_lot::RwLock;
use ahash::AHashMap;

use crate::segments::FieldSegments;

/// Cached decimation and segmentation results for one dataset
#[derive(Debug, Default)]
pub struct DerivedCache {
    /// Overview sample as indices into the record store
    overview: RwLock<Option<Arc<Vec<usize>>>>,
    /// Segments keyed by field name
    segments: RwLock<AHashMap<String, Arc<FieldSegments>>>,
}

impl DerivedCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached overview indices, computing them on first use
    pub fn overview_or_insert_with(&self, compute: impl FnOnce() -> Vec<usize>) -> Arc<Vec<usize>> {
        if let Some(indices) = self.overview.read().as_ref() {
            return indices.clone();
        }
        let mut slot = self.overview.write();
        slot.get_or_insert_with(|| Arc::new(compute())).clone()
    }

    /// Cached segments for `field`, computing them on first use
    pub fn segments_or_insert_with(
        &self,
        field: &str,
        compute: impl FnOnce() -> FieldSegments,
    ) -> Arc<FieldSegments> {
        if let Some(segments) = self.segments.read().get(field) {
            return segments.clone();
        }
        let mut segments = self.segments.write();
        segments
            .entry(field.to_string())
            .or_insert_with(|| Arc::new(compute()))
            .clone()
    }

    pub fn cached_segment_fields(&self) -> usize {
        self.segments.read().len()
    }

    pub fn clear(&self) {
        *self.overview.write() = None;
        self.segments.write().clear();
    }
}
