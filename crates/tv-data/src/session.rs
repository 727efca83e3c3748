//! Dataset lifecycle
//!
//! A [`DatasetSession`] holds the active [`Dataset`] and the field
//! descriptors, and keeps the shared viewport in step with them. Each load
//! builds a complete new dataset (records, schema, empty derived cache) and
//! swaps it in under one write lock; nothing derived from the previous load
//! survives the swap.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use anyhow::Context;
use parking_lot::RwLock;

use tv_core::events::events::{DatasetLoaded, DatasetRejected, FieldSelectionChanged};
use tv_core::{EventBus, HoverEvent, Timestamp, ViewId, ViewportCoordinator, ZoomWindow};

use crate::cache::DerivedCache;
use crate::config::IngestConfig;
use crate::record::Record;
use crate::reduce::{stride_indices, SeriesReducer};
use crate::schema::{FieldDescriptor, SchemaInferencer, SchemaInfo};
use crate::segments::{FieldSegments, SegmentEncoder};
use crate::sources::TextSource;
use crate::store::RecordStore;
use crate::DataError;

/// Everything produced by one load. Immutable apart from its cache.
#[derive(Debug)]
pub struct Dataset {
    /// Increases by one with every successful load of a session
    pub generation: u64,
    pub source_name: String,
    pub store: RecordStore,
    pub schema: SchemaInfo,
    /// Rows skipped because their timestamp could not be parsed
    pub dropped_rows: usize,
    reducer: SeriesReducer,
    cache: DerivedCache,
}

impl Dataset {
    /// Reduced full-extent series, cached
    pub fn overview(self: &Arc<Self>) -> RenderSeries {
        let indices = self
            .cache
            .overview_or_insert_with(|| stride_indices(self.store.len(), self.reducer.overview_target()));
        RenderSeries {
            dataset: self.clone(),
            indices,
        }
    }

    /// Reduced series for `window`; zoomed windows are resampled from
    /// full-resolution records
    pub fn series_for(self: &Arc<Self>, window: &ZoomWindow) -> RenderSeries {
        match window {
            ZoomWindow::Full => self.overview(),
            ZoomWindow::Range(_) => RenderSeries {
                dataset: self.clone(),
                indices: Arc::new(self.reducer.window_indices(&self.store, window)),
            },
        }
    }

    /// Segments and gaps of `field`, cached
    pub fn segments(&self, field: &str) -> Arc<FieldSegments> {
        self.cache
            .segments_or_insert_with(field, || SegmentEncoder::encode(self.store.records(), field))
    }
}

/// Records selected for rendering, tied to the dataset they index into
#[derive(Debug, Clone)]
pub struct RenderSeries {
    dataset: Arc<Dataset>,
    indices: Arc<Vec<usize>>,
}

impl RenderSeries {
    pub fn generation(&self) -> u64 {
        self.dataset.generation
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> + '_ {
        let records = self.dataset.store.records();
        self.indices.iter().map(move |&i| &records[i])
    }
}

struct SessionState {
    dataset: Option<Arc<Dataset>>,
    descriptors: Vec<FieldDescriptor>,
}

/// Owner of the active dataset, wired to the shared viewport and event bus
pub struct DatasetSession {
    config: IngestConfig,
    state: RwLock<SessionState>,
    viewport: Arc<ViewportCoordinator>,
    events: Arc<EventBus>,
    generation: AtomicU64,
}

impl DatasetSession {
    pub fn new(config: IngestConfig, viewport: Arc<ViewportCoordinator>, events: Arc<EventBus>) -> Self {
        Self {
            config,
            state: RwLock::new(SessionState {
                dataset: None,
                descriptors: Vec::new(),
            }),
            viewport,
            events,
            generation: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Arc<ViewportCoordinator> {
        &self.viewport
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    /// Parse `text` and make it the active dataset
    pub fn load_text(&self, source_name: &str, text: &str) -> Result<Arc<Dataset>, DataError> {
        self.load_source(&TextSource::new(source_name, text))
    }

    /// Read a file and make it the active dataset
    pub fn load_file(&self, path: impl AsRef<Path>) -> anyhow::Result<Arc<Dataset>> {
        let path = path.as_ref();
        let source = TextSource::from_path(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        self.load_source(&source)
            .with_context(|| format!("Failed to load {}", path.display()))
    }

    /// Parse `source` and swap it in.
    ///
    /// On failure the previous dataset stays active and a
    /// [`DatasetRejected`] event is published.
    pub fn load_source(&self, source: &TextSource) -> Result<Arc<Dataset>, DataError> {
        let inferred = match source
            .read_table()
            .and_then(|table| SchemaInferencer::new(&self.config).infer(&table))
        {
            Ok(inferred) => inferred,
            Err(e) => {
                tracing::error!("Failed to load {}: {}", source.source_name(), e);
                self.events.publish(DatasetRejected {
                    source_name: source.source_name().to_string(),
                    error: e.to_string(),
                });
                return Err(e);
            }
        };

        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let dataset = Arc::new(Dataset {
            generation,
            source_name: source.source_name().to_string(),
            store: inferred.store,
            schema: inferred.schema,
            dropped_rows: inferred.dropped_rows,
            reducer: SeriesReducer::new(self.config.overview_target, self.config.window_target),
            cache: DerivedCache::new(),
        });

        {
            let mut state = self.state.write();
            state.descriptors = dataset.schema.descriptors.clone();
            state.dataset = Some(dataset.clone());
        }

        // Subscribers may read the session back, so the state lock is released first
        let bounds = dataset.store.extent();
        match bounds {
            Some(bounds) => self.viewport.set_data_bounds(bounds),
            None => self.viewport.clear_data_bounds(),
        }

        tracing::info!(
            "Loaded {}: {} records, {} fields",
            dataset.source_name,
            dataset.store.len(),
            dataset.schema.descriptors.len()
        );

        self.events.publish(DatasetLoaded {
            source_name: dataset.source_name.clone(),
            record_count: dataset.store.len(),
            field_count: dataset.schema.descriptors.len(),
            dropped_rows: dataset.dropped_rows,
            bounds,
        });

        Ok(dataset)
    }

    pub fn dataset(&self) -> Option<Arc<Dataset>> {
        self.state.read().dataset.clone()
    }

    /// Plottable fields in header order, with the current selection flags
    pub fn descriptors(&self) -> Vec<FieldDescriptor> {
        self.state.read().descriptors.clone()
    }

    pub fn selected_fields(&self) -> Vec<FieldDescriptor> {
        self.state
            .read()
            .descriptors
            .iter()
            .filter(|d| d.selected)
            .cloned()
            .collect()
    }

    /// Toggle a field's selection. Returns `false` for an unknown field.
    pub fn set_selected(&self, field: &str, selected: bool) -> bool {
        let changed = {
            let mut state = self.state.write();
            match state.descriptors.iter_mut().find(|d| d.name == field) {
                Some(descriptor) => {
                    let changed = descriptor.selected != selected;
                    descriptor.selected = selected;
                    Some(changed)
                }
                None => None,
            }
        };

        match changed {
            Some(true) => {
                self.events.publish(FieldSelectionChanged {
                    field: field.to_string(),
                    selected,
                });
                true
            }
            Some(false) => true,
            None => false,
        }
    }

    /// Series for the viewport's current window
    pub fn visible_series(&self) -> Option<RenderSeries> {
        let dataset = self.dataset()?;
        Some(dataset.series_for(&self.viewport.current_zoom()))
    }

    pub fn segments(&self, field: &str) -> Option<Arc<FieldSegments>> {
        self.dataset().map(|dataset| dataset.segments(field))
    }

    /// Hover event snapped to the record nearest `time`
    pub fn hover_at(&self, time: Timestamp, view: Option<ViewId>) -> Option<HoverEvent> {
        let dataset = self.dataset()?;
        let index = dataset.store.nearest_index(time)?;
        let record = dataset.store.get(index)?;
        Some(HoverEvent {
            time: record.timestamp,
            source: view,
            record_index: Some(index),
        })
    }
}

impl Default for DatasetSession {
    fn default() -> Self {
        Self::new(
            IngestConfig::default(),
            Arc::new(ViewportCoordinator::default()),
            Arc::new(EventBus::new()),
        )
    }
}
