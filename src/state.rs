use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::AppConfig;
use crate::data::cascade::{cascade, CascadeOutcome};
use crate::data::dimension::Dimension;
use crate::data::filter::{FilteredView, SelectionState};
use crate::data::model::{Dataset, FieldValue};
use crate::data::store::DatasetStore;
use crate::stats::buckets::{bucketize, cap_bounds, BucketConfig, BucketMode, BucketReport, CapBounds, PriceStat};
use crate::stats::charts::{model_price_boxes, year_brand_counts, yearly_uplift, PriceBox, YearBrandCount, YearUplift};
use crate::stats::summary::{summarize, PriceSummary};

pub const EMPTY_RESULT_MESSAGE: &str = "No rows match the current filters. Try removing one filter.";

// ---------------------------------------------------------------------------
// Derived chart data
// ---------------------------------------------------------------------------

/// Everything the central panel draws, recomputed after each user action.
#[derive(Debug, Clone, Default)]
pub struct ChartData {
    pub year_brand: Vec<YearBrandCount>,
    pub price_boxes: Vec<PriceBox>,
    pub uplift: Vec<YearUplift>,
    /// `None` when no listing in the subset has both mileage and price.
    pub mileage: Option<BucketReport>,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<Arc<Dataset>>,

    /// Latest cascade pass: per-dimension options, reconciled selection, visible rows.
    pub outcome: CascadeOutcome,

    pub summary: PriceSummary,
    pub charts: ChartData,

    /// Brand colours for the count chart.
    pub color_map: Option<ColorMap>,

    pub bucket_mode: BucketMode,
    pub price_stat: PriceStat,
    pub cap_bounds: Option<CapBounds>,
    pub mileage_cap: f64,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            bucket_mode: config.bucket_mode,
            price_stat: config.price_stat,
            config,
            dataset: None,
            outcome: CascadeOutcome {
                options: Vec::new(),
                selection: SelectionState::default(),
                visible: Vec::new(),
            },
            summary: PriceSummary::Empty,
            charts: ChartData::default(),
            color_map: None,
            cap_bounds: None,
            mileage_cap: 0.0,
            status_message: None,
        }
    }

    /// Load through `store` and start a session, or surface the failure.
    pub fn open_store(&mut self, store: &DatasetStore) {
        match store.load() {
            Ok(dataset) => {
                if dataset.is_empty() {
                    log::warn!("{} holds no listings", store.path().display());
                }
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", store.path().display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Ingest a newly loaded dataset: fresh selections, colours and charts.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.color_map = Some(ColorMap::new(&dataset, Dimension::Brand));
        self.outcome.selection = SelectionState::default();
        self.cap_bounds = None;
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// The current working subset.
    pub fn view(&self) -> Option<FilteredView<'_>> {
        self.dataset
            .as_deref()
            .map(|ds| FilteredView::new(ds, &self.outcome.visible))
    }

    /// Full recompute after a filter change: cascade, summary, charts.
    pub fn refilter(&mut self) {
        let Some(ds) = self.dataset.clone() else {
            return;
        };
        let selection = std::mem::take(&mut self.outcome.selection);
        self.outcome = cascade(&ds, selection);

        let view = FilteredView::new(&ds, &self.outcome.visible);
        self.summary = summarize(view.records());
        if self.summary.is_empty() {
            log::warn!("{EMPTY_RESULT_MESSAGE}");
        }

        // New subset, new slider range: start again from the default cap.
        let bounds = cap_bounds(
            view.records(),
            self.config.cap_percentile,
            self.config.cap_max_percentile,
        );
        if bounds != self.cap_bounds {
            self.mileage_cap = bounds.map(|b| b.default).unwrap_or_default();
            self.cap_bounds = bounds;
        }

        self.charts.year_brand = year_brand_counts(view.records());
        self.charts.price_boxes = model_price_boxes(view.records());
        self.charts.uplift = yearly_uplift(view.records());
        self.rebucket();
    }

    /// Recompute only the mileage chart.
    pub fn rebucket(&mut self) {
        let report = match (self.view(), self.cap_bounds) {
            (Some(view), Some(_)) => Some(bucketize(view.records(), &self.bucket_config())),
            _ => None,
        };
        self.charts.mileage = report;
    }

    pub fn bucket_config(&self) -> BucketConfig {
        BucketConfig {
            cap: self.mileage_cap,
            mode: self.bucket_mode,
            stat: self.price_stat,
        }
    }

    /// Tick or untick one value of a dimension's filter.
    pub fn toggle_value(&mut self, dimension: Dimension, value: &FieldValue) {
        self.outcome.selection.toggle(dimension, value);
        self.refilter();
    }

    /// Remove every value from one dimension's filter ("All").
    pub fn clear_dimension(&mut self, dimension: Dimension) {
        self.outcome.selection.clear(dimension);
        self.refilter();
    }

    pub fn clear_all(&mut self) {
        self.outcome.selection = SelectionState::default();
        self.refilter();
    }

    pub fn set_bucket_mode(&mut self, mode: BucketMode) {
        self.bucket_mode = mode;
        self.rebucket();
    }

    pub fn set_price_stat(&mut self, stat: PriceStat) {
        self.price_stat = stat;
        self.rebucket();
    }

    pub fn set_mileage_cap(&mut self, cap: f64) {
        self.mileage_cap = cap;
        self.rebucket();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::five_listings;
    use std::fs;
    use tempfile::TempDir;

    fn loaded() -> AppState {
        let mut state = AppState::new(AppConfig::default());
        state.set_dataset(Arc::new(five_listings()));
        state
    }

    #[test]
    fn fresh_session_shows_everything() {
        let state = loaded();
        assert_eq!(state.outcome.visible.len(), 5);
        assert_eq!(state.summary.count(), 5);
        assert_eq!(state.outcome.options.len(), Dimension::ALL.len());
        assert!(state.charts.mileage.is_some());
    }

    #[test]
    fn user_actions_run_the_cascade() {
        let mut state = loaded();
        state.toggle_value(Dimension::Year, &FieldValue::Integer(2019));
        state.toggle_value(Dimension::Brand, &"A".into());
        assert_eq!(state.outcome.visible, vec![3]);

        // Model=Y only exists in 2021, so the Year pick disappears.
        state.toggle_value(Dimension::Model, &"Y".into());
        assert!(state.outcome.selection.get(Dimension::Year).is_empty());
        assert_eq!(state.outcome.visible, vec![1]);
        assert_eq!(
            state.summary,
            PriceSummary::Populated {
                count: 1,
                min: Some(20_000.0),
                median: Some(20_000.0),
                max: Some(20_000.0),
            }
        );

        state.clear_all();
        assert_eq!(state.outcome.visible.len(), 5);
    }

    #[test]
    fn clearing_one_dimension_keeps_the_others() {
        let mut state = loaded();
        state.toggle_value(Dimension::Brand, &"B".into());
        state.toggle_value(Dimension::Year, &FieldValue::Integer(2021));
        state.clear_dimension(Dimension::Brand);
        assert_eq!(state.outcome.visible, vec![1, 4]);
    }

    #[test]
    fn bucketing_controls_recompute_the_report() {
        let mut state = loaded();
        state.set_bucket_mode(BucketMode::Quantile);
        let report = state.charts.mileage.as_ref().unwrap();
        // Every fixture listing has the same mileage.
        assert!(report.degraded);

        state.set_price_stat(PriceStat::Mean);
        state.set_mileage_cap(10_000.0);
        assert!(state.charts.mileage.as_ref().unwrap().buckets.is_empty());
    }

    #[test]
    fn failed_load_is_reported_not_fatal_to_the_process() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cars.csv");
        fs::write(&path, "Brand,Model\nA,X\n").unwrap();

        let mut state = AppState::new(AppConfig::default());
        state.open_store(&DatasetStore::new(&path));
        assert!(state.dataset.is_none());
        let msg = state.status_message.unwrap();
        assert!(msg.contains("missing required column"), "{msg}");
    }
}
