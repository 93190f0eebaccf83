use std::path::Path;
use std::sync::Arc;

use crate::config::{DashboardConfig, MapConfig};
use crate::data::aggregate::{DashboardViews, HeatPoint};
use crate::data::filter::{BorderFilter, FilterState};
use crate::data::loader::load_file;
use crate::data::model::CrossingDataset;

// ---------------------------------------------------------------------------
// Map view: created once, mutated in place afterwards
// ---------------------------------------------------------------------------

/// Camera and heat layer of the geographic view.
#[derive(Debug, Clone)]
pub struct MapView {
    pub center: [f64; 2],
    zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub point_radius: f32,
    /// Set when the zoom changed and the plot bounds must be re-applied.
    zoom_dirty: bool,
    heat: Vec<HeatPoint>,
    max_weight: i64,
}

impl MapView {
    pub fn new(config: &MapConfig) -> Self {
        log::debug!("initialising map view at {:?}, zoom {}", config.center, config.zoom);
        Self {
            center: config.center,
            zoom: config.zoom.clamp(config.min_zoom, config.max_zoom),
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            point_radius: config.point_radius,
            zoom_dirty: true,
            heat: Vec::new(),
            max_weight: 0,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        let zoom = zoom.round().clamp(self.min_zoom, self.max_zoom);
        if zoom != self.zoom {
            self.zoom = zoom;
            self.zoom_dirty = true;
        }
    }

    /// Returns `true` once after each zoom change.
    pub fn take_zoom_change(&mut self) -> bool {
        std::mem::take(&mut self.zoom_dirty)
    }

    /// Half extents `(longitude, latitude)` in degrees visible at the
    /// current zoom. Zoom 1 shows the whole globe; each step halves it.
    pub fn half_extent(&self) -> (f64, f64) {
        let lon = 180.0 / 2f64.powf(self.zoom - 1.0);
        (lon, (lon / 2.0).min(90.0))
    }

    /// Replace the whole point set.
    pub fn set_heat(&mut self, points: Vec<HeatPoint>) {
        self.max_weight = points.iter().map(|p| p.weight).max().unwrap_or(0);
        self.heat = points;
    }

    pub fn heat(&self) -> &[HeatPoint] {
        &self.heat
    }

    pub fn max_weight(&self) -> i64 {
        self.max_weight
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset (None until a load succeeds).
    pub dataset: Option<Arc<CrossingDataset>>,

    /// Year and border selection.
    pub filters: FilterState,

    /// Views derived from `dataset` and `filters` (cached).
    pub views: DashboardViews,

    /// Created on first access.
    map: Option<MapView>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            dataset: None,
            filters: FilterState::default(),
            views: DashboardViews::default(),
            map: None,
            status_message: None,
        }
    }

    /// The map view, constructed from the config on first use.
    pub fn map_mut(&mut self) -> &mut MapView {
        self.map.get_or_insert_with(|| MapView::new(&self.config.map))
    }

    /// Read a dataset file and make it the current snapshot. Failures are
    /// logged and shown in the status line; the previous snapshot is kept.
    pub fn load_path(&mut self, path: &Path) {
        match load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} crossing records spanning {} years from {}",
                    dataset.len(),
                    dataset.years.len(),
                    path.display()
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load dataset: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded dataset and reset the year selection.
    pub fn set_dataset(&mut self, dataset: CrossingDataset) {
        self.dataset = Some(Arc::new(dataset));
        self.filters.year = None;
        self.status_message = None;
        self.recompute();
    }

    /// Recompute titles and all three views.
    pub fn recompute(&mut self) {
        let Some(ds) = self.dataset.clone() else {
            return;
        };
        self.views = DashboardViews::compute(&ds.records, &self.filters);
        log::debug!(
            "recomputed views: mode {:?}, {} countries, {} series points, {} heat points",
            self.filters.mode(),
            self.views.shares.entries.len(),
            self.views.series.len(),
            self.views.heat.len()
        );
        let heat = self.views.heat.clone();
        self.map_mut().set_heat(heat);
    }

    /// Year dropdown changed. `None` is the "All" option.
    pub fn select_year(&mut self, year: Option<String>) {
        if let (Some(y), Some(ds)) = (&year, &self.dataset) {
            if !ds.has_year(y) {
                log::warn!("ignoring unknown year {y}");
                return;
            }
        }
        self.filters.year = year;
        self.recompute();
    }

    /// Border select changed; only the heatmap follows it.
    pub fn select_border(&mut self, border: BorderFilter) {
        self.filters.border = border;
        let Some(ds) = self.dataset.clone() else {
            return;
        };
        self.views.refresh_heat(&ds.records, border);
        let heat = self.views.heat.clone();
        self.map_mut().set_heat(heat);
    }
}
