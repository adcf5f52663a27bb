use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;

use super::error::DataError;
use super::filter::distinct_labels;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a study table
// ---------------------------------------------------------------------------

/// A dynamically-typed table cell mirroring the dtypes of the upstream CSVs.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    Null,
}

// -- Manual Eq/Ord so CellValue can key ordered collections --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
                Date(_) => 5,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            CellValue::Null => write!(f, ""),
        }
    }
}

impl CellValue {
    /// Interpret the cell as an `f64` for plotting or flag checks.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Borrow the cell as a string label (selector comparisons).
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// The cell as a calendar date, if it is one.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Table – one named, immutable dataset
// ---------------------------------------------------------------------------

/// A flat column-major table. Never mutated after the store is built, except
/// for the one-time date coercion during loading.
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<String>,
    cells: Vec<Vec<CellValue>>,
    rows: usize,
}

impl Table {
    /// Build from column names and row-major records (the loaders' natural
    /// output). Short records are padded with nulls.
    pub fn from_rows(columns: Vec<String>, records: Vec<Vec<CellValue>>) -> Self {
        let rows = records.len();
        let mut cells: Vec<Vec<CellValue>> =
            columns.iter().map(|_| Vec::with_capacity(rows)).collect();
        for mut record in records {
            record.resize(columns.len(), CellValue::Null);
            for (c, value) in record.into_iter().enumerate().take(columns.len()) {
                cells[c].push(value);
            }
        }
        Table {
            columns,
            cells,
            rows,
        }
    }

    /// Build from already column-major data.
    pub fn from_columns(
        columns: Vec<String>,
        cells: Vec<Vec<CellValue>>,
    ) -> Result<Self, DataError> {
        let rows = cells.first().map_or(0, Vec::len);
        for (name, col) in columns.iter().zip(&cells) {
            if col.len() != rows {
                return Err(DataError::RaggedColumn {
                    column: name.clone(),
                    got: col.len(),
                    expected: rows,
                });
            }
        }
        Ok(Table {
            columns,
            cells,
            rows,
        })
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// All cells of a column, or `None` if the column does not exist.
    pub fn column(&self, name: &str) -> Option<&[CellValue]> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.cells[idx].as_slice())
    }

    /// One cell by row index and column name.
    pub fn cell(&self, row: usize, name: &str) -> Option<&CellValue> {
        self.column(name)?.get(row)
    }

    /// Parse every string cell of `column` as an ISO date, in place. The
    /// upstream CSVs store dates as text; this is the one-time coercion done
    /// while the store is built.
    pub fn coerce_date_column(&mut self, dataset: &str, column: &str) -> Result<(), DataError> {
        let Some(idx) = self.columns.iter().position(|c| c == column) else {
            return Ok(());
        };
        for (row, cell) in self.cells[idx].iter_mut().enumerate() {
            let parsed = match cell {
                CellValue::String(s) => {
                    let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
                        DataError::BadDate {
                            dataset: dataset.to_string(),
                            row,
                            value: s.clone(),
                        }
                    })?;
                    CellValue::Date(date)
                }
                CellValue::Date(_) | CellValue::Null => continue,
                other => {
                    return Err(DataError::BadDate {
                        dataset: dataset.to_string(),
                        row,
                        value: other.to_string(),
                    })
                }
            };
            *cell = parsed;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Dataset schemas
// ---------------------------------------------------------------------------

/// The column every dataset is keyed (and filtered) by.
pub const KEY_COLUMN: &str = "geography";

/// The dataset whose distinct key values define the selector domain.
pub const REFERENCE_DATASET: &str = "figure1";

/// Expected shape of one named dataset. `required` lists the non-key columns
/// the view builder reads; extra columns are allowed and ignored.
pub struct DatasetSchema {
    pub name: &'static str,
    pub required: &'static [&'static str],
}

pub const SCHEMAS: &[DatasetSchema] = &[
    DatasetSchema {
        name: "figure1",
        required: &[
            "date",
            "percent_red",
            "percent_red_lower",
            "percent_red_upper",
            "grocery_pharmacy",
            "workplace",
            "residential",
        ],
    },
    DatasetSchema {
        name: "figure12_sip",
        required: &["date", "SIP"],
    },
    DatasetSchema {
        name: "table1",
        required: &["variable", "coefficient", "p_value", "standard_error"],
    },
    DatasetSchema {
        name: "figure2",
        required: &[
            "date",
            "percent_red",
            "mars_elec",
            "breakpoint",
            "breakpoint_and_SIP_chg",
        ],
    },
    DatasetSchema {
        name: "table2",
        required: &["Term", "Break Point", "Date", "Slope After"],
    },
    DatasetSchema {
        name: "table3",
        required: &[
            "mobility_type_desc",
            "coefficient",
            "standard_error",
            "p_value",
            "R2",
            "N",
        ],
    },
    DatasetSchema {
        name: "table4",
        required: &[
            "mobility_type_desc",
            "coefficient",
            "standard_error",
            "p_value",
        ],
    },
    DatasetSchema {
        name: "figure3",
        required: &["Day.type", "hour", "load_median", "load_Q10", "load_Q90"],
    },
    DatasetSchema {
        name: "table5",
        required: &["type_desc", "historic", "actual"],
    },
];

// ---------------------------------------------------------------------------
// DataStore – the complete loaded collection
// ---------------------------------------------------------------------------

/// All study datasets plus the selector domain, validated at construction and
/// read-only afterwards. Built once in `main` (or from the folder picker) and
/// passed by reference into the view builder.
#[derive(Debug, Clone)]
pub struct DataStore {
    tables: BTreeMap<String, Table>,
    geographies: Vec<String>,
}

impl DataStore {
    /// Validate the loaded tables against [`SCHEMAS`] and compute the
    /// selector domain from the reference dataset.
    ///
    /// A geography listed in the reference dataset but absent from another
    /// dataset is only logged: the view builder renders it as empty rather
    /// than failing.
    pub fn new(tables: BTreeMap<String, Table>) -> Result<Self, DataError> {
        for schema in SCHEMAS {
            let table = tables
                .get(schema.name)
                .ok_or_else(|| DataError::MissingTable(schema.name.to_string()))?;
            for column in std::iter::once(&KEY_COLUMN).chain(schema.required) {
                if !table.has_column(column) {
                    return Err(DataError::MissingColumn {
                        dataset: schema.name.to_string(),
                        column: column.to_string(),
                    });
                }
            }
        }

        // First-appearance order, matching the upstream dropdown.
        let geographies = distinct_labels(&tables[REFERENCE_DATASET], KEY_COLUMN);

        for schema in SCHEMAS.iter().filter(|s| s.name != REFERENCE_DATASET) {
            let covered = distinct_labels(&tables[schema.name], KEY_COLUMN);
            for geo in &geographies {
                if !covered.contains(geo) {
                    log::warn!(
                        "dataset '{}' has no rows for geography '{geo}'",
                        schema.name
                    );
                }
            }
        }

        Ok(DataStore {
            tables,
            geographies,
        })
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Valid selector values, in the order the reference dataset lists them.
    pub fn geographies(&self) -> &[String] {
        &self.geographies
    }

    pub fn tables(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.tables.iter().map(|(n, t)| (n.as_str(), t))
    }

    pub fn dataset_count(&self) -> usize {
        self.tables.len()
    }

    pub fn total_rows(&self) -> usize {
        self.tables.values().map(Table::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_pads_short_records() {
        let table = Table::from_rows(
            vec!["a".into(), "b".into()],
            vec![
                vec![CellValue::Integer(1), CellValue::Integer(2)],
                vec![CellValue::Integer(3)],
            ],
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(1, "b"), Some(&CellValue::Null));
    }

    #[test]
    fn from_columns_rejects_ragged_input() {
        let err = Table::from_columns(
            vec!["a".into(), "b".into()],
            vec![
                vec![CellValue::Integer(1), CellValue::Integer(2)],
                vec![CellValue::Integer(3)],
            ],
        )
        .unwrap_err();
        assert!(matches!(err, DataError::RaggedColumn { .. }));
    }

    #[test]
    fn coerce_date_column_parses_iso_strings() {
        let mut table = Table::from_rows(
            vec!["date".into()],
            vec![
                vec![CellValue::String("2020-02-15".into())],
                vec![CellValue::Null],
            ],
        );
        table.coerce_date_column("figure1", "date").unwrap();
        assert_eq!(
            table.cell(0, "date").and_then(CellValue::as_date),
            NaiveDate::from_ymd_opt(2020, 2, 15)
        );
        assert_eq!(table.cell(1, "date"), Some(&CellValue::Null));
    }

    #[test]
    fn coerce_date_column_rejects_garbage() {
        let mut table = Table::from_rows(
            vec!["date".into()],
            vec![vec![CellValue::String("not-a-date".into())]],
        );
        let err = table.coerce_date_column("figure1", "date").unwrap_err();
        assert!(matches!(err, DataError::BadDate { row: 0, .. }));
    }

    #[test]
    fn store_rejects_missing_required_column() {
        let mut tables = crate::data::testdata::sample_tables();
        tables.insert(
            "table1".into(),
            Table::from_rows(vec![KEY_COLUMN.into()], Vec::new()),
        );
        let err = DataStore::new(tables).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn { .. }));
    }

    #[test]
    fn store_geographies_keep_first_appearance_order() {
        let store = crate::data::testdata::sample_store();
        assert_eq!(store.geographies(), ["Italy", "Spain"]);
    }
}
