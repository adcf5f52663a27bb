use std::path::Path;

use crate::data::loader;
use crate::data::model::DataStore;
use crate::views::{build_views, ViewBundle};

/// The dropdown starts on Italy when the data contains it, matching the
/// published dashboard.
const PREFERRED_GEOGRAPHY: &str = "Italy";

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering. The store is immutable once
/// set; only the selection (and the bundle derived from it) changes.
pub struct AppState {
    /// Loaded datasets (None until a data directory loads successfully).
    pub store: Option<DataStore>,

    /// Current selector value.
    pub selected_geography: Option<String>,

    /// Views for the current selection, rebuilt on every selector change.
    pub views: Option<ViewBundle>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            store: None,
            selected_geography: None,
            views: None,
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a freshly loaded store and build views for the default
    /// geography.
    pub fn set_store(&mut self, store: DataStore) {
        let default_geo = store
            .geographies()
            .iter()
            .find(|g| *g == PREFERRED_GEOGRAPHY)
            .or_else(|| store.geographies().first())
            .cloned();

        self.store = Some(store);
        self.selected_geography = default_geo;
        self.status_message = None;
        self.rebuild_views();
    }

    /// Selector change: the one UI event that drives everything.
    pub fn select_geography(&mut self, geography: String) {
        if self.selected_geography.as_deref() == Some(geography.as_str()) {
            return;
        }
        self.selected_geography = Some(geography);
        self.rebuild_views();
    }

    fn rebuild_views(&mut self) {
        self.views = match (&self.store, &self.selected_geography) {
            (Some(store), Some(geo)) => Some(build_views(store, geo)),
            _ => None,
        };
    }

    /// Load a data directory into the state. Failure is non-fatal: the error
    /// lands in the status line and the previous store (if any) stays.
    pub fn load_data_dir(&mut self, dir: &Path) {
        match loader::load_dir(dir) {
            Ok(store) => self.set_store(store),
            Err(e) => {
                log::error!("failed to load data from {}: {e:#}", dir.display());
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::testdata::sample_store;

    #[test]
    fn set_store_defaults_to_italy_and_builds_views() {
        let mut state = AppState::default();
        state.set_store(sample_store());
        assert_eq!(state.selected_geography.as_deref(), Some("Italy"));
        assert!(state.views.is_some());
    }

    #[test]
    fn select_geography_rebuilds_the_bundle() {
        let mut state = AppState::default();
        state.set_store(sample_store());
        let italy = state.views.clone().unwrap();

        state.select_geography("Spain".to_string());
        let spain = state.views.clone().unwrap();
        assert_ne!(italy.table1.rows, spain.table1.rows);

        // Re-selecting the same value is a no-op that keeps the bundle.
        state.select_geography("Spain".to_string());
        assert_eq!(state.views.as_ref(), Some(&spain));
    }

    #[test]
    fn load_failure_keeps_state_and_sets_status() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::default();
        state.load_data_dir(dir.path());
        assert!(state.store.is_none());
        assert!(state.status_message.is_some());
    }
}
