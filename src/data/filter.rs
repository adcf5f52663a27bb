use super::model::Table;

// ---------------------------------------------------------------------------
// Row selection by the categorical key
// ---------------------------------------------------------------------------

/// Indices of rows whose `column` cell equals the string `value`.
///
/// A missing column, like a value no row carries, yields an empty selection:
/// the view builder renders empty charts and tables instead of erroring.
pub fn filter_eq(table: &Table, column: &str, value: &str) -> Vec<usize> {
    let Some(cells) = table.column(column) else {
        return Vec::new();
    };
    cells
        .iter()
        .enumerate()
        .filter(|(_, cell)| cell.as_str() == Some(value))
        .map(|(i, _)| i)
        .collect()
}

/// Distinct string values of a column, in first-appearance order.
pub fn distinct_labels(table: &Table, column: &str) -> Vec<String> {
    let mut seen = Vec::new();
    if let Some(cells) = table.column(column) {
        for cell in cells {
            if let Some(label) = cell.as_str() {
                if !seen.iter().any(|s| s == label) {
                    seen.push(label.to_string());
                }
            }
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn table() -> Table {
        Table::from_rows(
            vec!["geography".into(), "v".into()],
            vec![
                vec![CellValue::String("Italy".into()), CellValue::Integer(1)],
                vec![CellValue::String("Spain".into()), CellValue::Integer(2)],
                vec![CellValue::String("Italy".into()), CellValue::Integer(3)],
            ],
        )
    }

    #[test]
    fn filter_eq_selects_only_matching_rows() {
        let t = table();
        assert_eq!(filter_eq(&t, "geography", "Italy"), [0, 2]);
        assert_eq!(filter_eq(&t, "geography", "Spain"), [1]);
    }

    #[test]
    fn filter_eq_unknown_value_is_empty() {
        assert!(filter_eq(&table(), "geography", "France").is_empty());
    }

    #[test]
    fn filter_eq_missing_column_is_empty() {
        assert!(filter_eq(&table(), "country", "Italy").is_empty());
    }

    #[test]
    fn distinct_labels_preserve_first_appearance_order() {
        assert_eq!(distinct_labels(&table(), "geography"), ["Italy", "Spain"]);
    }
}
