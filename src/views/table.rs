use crate::data::filter::filter_eq;
use crate::data::model::{DataStore, Table, KEY_COLUMN};

// ---------------------------------------------------------------------------
// Table payloads
// ---------------------------------------------------------------------------

/// A rendered table: display column headers plus stringified rows. Built by a
/// pure projection of the filtered dataset, one output column per entry in the
/// projection list, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    pub id: &'static str,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Select `rows` from `table`, project the `(source, header)` column pairs in
/// order, and stringify the cells. Missing columns render as empty cells so an
/// unexpected schema shows up as a blank column, not a crash.
fn project(
    id: &'static str,
    table: &Table,
    rows: &[usize],
    columns: &[(&str, &str)],
) -> TableSpec {
    TableSpec {
        id,
        columns: columns.iter().map(|(_, header)| header.to_string()).collect(),
        rows: rows
            .iter()
            .map(|&r| {
                columns
                    .iter()
                    .map(|(source, _)| {
                        table
                            .cell(r, source)
                            .map(|c| c.to_string())
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect(),
    }
}

fn build(
    store: &DataStore,
    dataset: &str,
    geography: &str,
    id: &'static str,
    columns: &[(&str, &str)],
) -> TableSpec {
    match store.table(dataset) {
        Some(table) => {
            let rows = filter_eq(table, KEY_COLUMN, geography);
            project(id, table, &rows, columns)
        }
        None => TableSpec {
            id,
            columns: columns.iter().map(|(_, h)| h.to_string()).collect(),
            rows: Vec::new(),
        },
    }
}

// ---------------------------------------------------------------------------
// Table builders (projection lists from the source figures)
// ---------------------------------------------------------------------------

/// Table 1: OLS model of demand change vs. CI level.
pub fn ols_table(store: &DataStore, geography: &str) -> TableSpec {
    build(
        store,
        "table1",
        geography,
        "table1",
        &[
            ("variable", "Variable"),
            ("coefficient", "Coefficient"),
            ("p_value", "P-value"),
            ("standard_error", "Standard Error"),
        ],
    )
}

/// Table 2: MARS model terms. Source headers are already display names.
pub fn spline_terms_table(store: &DataStore, geography: &str) -> TableSpec {
    build(
        store,
        "table2",
        geography,
        "table2",
        &[
            ("Term", "Term"),
            ("Break Point", "Break Point"),
            ("Date", "Date"),
            ("Slope After", "Slope After"),
        ],
    )
}

/// Table 3: per-mobility-type elasticity coefficients.
pub fn elasticity_table(store: &DataStore, geography: &str) -> TableSpec {
    build(
        store,
        "table3",
        geography,
        "table3",
        &[
            ("mobility_type_desc", "Variable"),
            ("coefficient", "Coefficient"),
            ("standard_error", "Standard Error"),
            ("p_value", "P-value"),
            ("R2", "R-squared"),
            ("N", "N"),
        ],
    )
}

/// Table 4: all mobility types regressed jointly.
pub fn joint_model_table(store: &DataStore, geography: &str) -> TableSpec {
    build(
        store,
        "table4",
        geography,
        "table4",
        &[
            ("mobility_type_desc", "Variable"),
            ("coefficient", "Coefficient"),
            ("standard_error", "Standard Error"),
            ("p_value", "P-value"),
        ],
    )
}

/// Table 5: load-shape measures, historic vs. current April.
pub fn load_shape_table(store: &DataStore, geography: &str) -> TableSpec {
    build(
        store,
        "table5",
        geography,
        "table5",
        &[
            ("type_desc", "Load shape measure"),
            ("historic", "April 2016-2019"),
            ("actual", "April 2020"),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::testdata::sample_store;

    #[test]
    fn ols_table_renames_and_orders_columns() {
        let store = sample_store();
        let spec = ols_table(&store, "Italy");
        assert_eq!(
            spec.columns,
            ["Variable", "Coefficient", "P-value", "Standard Error"]
        );
        assert_eq!(spec.rows.len(), 2);
        assert_eq!(spec.rows[0], ["CI level 1", "-0.08", "0.01", "0.02"]);
    }

    #[test]
    fn row_count_matches_the_filtered_subset() {
        let store = sample_store();
        assert_eq!(elasticity_table(&store, "Italy").rows.len(), 2);
        assert_eq!(elasticity_table(&store, "Spain").rows.len(), 1);
        assert_eq!(elasticity_table(&store, "France").rows.len(), 0);
    }

    #[test]
    fn every_cell_comes_from_a_matching_row() {
        let store = sample_store();
        let spec = joint_model_table(&store, "Spain");
        for row in &spec.rows {
            // Spain's only table4 row is Workplace.
            assert_eq!(row[0], "Workplace");
        }
    }

    #[test]
    fn spline_terms_keep_source_headers() {
        let store = sample_store();
        let spec = spline_terms_table(&store, "Italy");
        assert_eq!(spec.columns, ["Term", "Break Point", "Date", "Slope After"]);
        assert_eq!(spec.rows[1][2], "2020-04-03");
    }

    #[test]
    fn load_shape_table_is_a_three_column_projection() {
        let store = sample_store();
        let spec = load_shape_table(&store, "Italy");
        assert_eq!(
            spec.columns,
            ["Load shape measure", "April 2016-2019", "April 2020"]
        );
        assert_eq!(spec.rows.len(), 2);
    }
}
