//! The view builder: one pure function from (store, selected geography) to
//! every chart and table payload the dashboard shows.
//!
//! This is the egui counterpart of the upstream single-callback design: the
//! selector change produces the whole bundle at once, synchronously, and the
//! presentation layer only draws what it is handed.

pub mod chart;
pub mod table;

use crate::data::model::DataStore;
use chart::ChartSpec;
use table::TableSpec;

/// All derived views for one selector value. Fixed arity: every slot is
/// always present, possibly with empty rows/series for an unmatched selector.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewBundle {
    pub figure1_ci: ChartSpec,
    pub figure1_ts: ChartSpec,
    pub table1: TableSpec,
    pub figure2_ci: ChartSpec,
    pub figure2_ts: ChartSpec,
    pub table2: TableSpec,
    pub table3: TableSpec,
    pub table4: TableSpec,
    pub figure3: ChartSpec,
    pub table5: TableSpec,
}

/// Build every view for `geography`. Pure and total: no state is touched and
/// an unknown geography yields empty payloads rather than an error.
pub fn build_views(store: &DataStore, geography: &str) -> ViewBundle {
    ViewBundle {
        figure1_ci: chart::ci_chart(store, geography, "figure1_ci", 130.0),
        figure1_ts: chart::demand_mobility_chart(store, geography),
        table1: table::ols_table(store, geography),
        figure2_ci: chart::ci_chart(store, geography, "figure2_ci", 210.0),
        figure2_ts: chart::spline_fit_chart(store, geography),
        table2: table::spline_terms_table(store, geography),
        table3: table::elasticity_table(store, geography),
        table4: table::joint_model_table(store, geography),
        figure3: chart::load_shape_chart(store, geography),
        table5: table::load_shape_table(store, geography),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::testdata::sample_store;

    #[test]
    fn every_valid_selector_fills_all_slots() {
        let store = sample_store();
        for geo in store.geographies() {
            let bundle = build_views(&store, geo);
            // Charts always carry their fixed item structure.
            assert!(!bundle.figure1_ci.items.is_empty());
            assert!(!bundle.figure1_ts.items.is_empty());
            assert!(!bundle.figure2_ts.items.is_empty());
            assert!(!bundle.figure3.items.is_empty());
            // Tables always carry their declared headers.
            assert_eq!(bundle.table1.columns.len(), 4);
            assert_eq!(bundle.table2.columns.len(), 4);
            assert_eq!(bundle.table3.columns.len(), 6);
            assert_eq!(bundle.table4.columns.len(), 4);
            assert_eq!(bundle.table5.columns.len(), 3);
        }
    }

    #[test]
    fn building_twice_is_identical() {
        let store = sample_store();
        assert_eq!(build_views(&store, "Italy"), build_views(&store, "Italy"));
    }

    #[test]
    fn unmatched_selector_is_empty_everywhere() {
        let store = sample_store();
        let bundle = build_views(&store, "Atlantis");
        assert!(bundle.table1.rows.is_empty());
        assert!(bundle.table5.rows.is_empty());
        assert_eq!(bundle.figure2_ts.segment_count(), 0);
        for item in &bundle.figure1_ts.items {
            match item {
                chart::ChartItem::Line { points, .. } => assert!(points.is_empty()),
                chart::ChartItem::Band { lower, upper, .. } => {
                    assert!(lower.is_empty() && upper.is_empty())
                }
                _ => {}
            }
        }
    }

    #[test]
    fn selectors_do_not_leak_into_each_other() {
        let store = sample_store();
        let italy = build_views(&store, "Italy");
        let spain = build_views(&store, "Spain");
        assert_ne!(italy.table1.rows, spain.table1.rows);
        assert_eq!(spain.figure2_ts.segment_count(), 0);
        assert_eq!(italy.figure2_ts.segment_count(), 2);
    }
}
