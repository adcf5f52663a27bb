//! Data layer: core types, loading, and filtering.
//!
//! Architecture:
//! ```text
//!  figure1.csv … table5.csv  (or .parquet / .json)
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse files → Table per dataset, coerce dates
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ DataStore  │  name → Table, validated schemas, selector domain
//!   └───────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  geography equality → row indices
//!   └──────────┘
//! ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;

/// Fixture datasets shared by the unit tests: two geographies, all nine
/// datasets, Italy with two flagged regime changes and Spain with none (the
/// zero-breakpoint branch).
#[cfg(test)]
pub(crate) mod testdata {
    use std::collections::BTreeMap;
    use std::path::Path;

    use super::model::{CellValue, DataStore, Table, SCHEMAS};

    pub const SAMPLE_CSVS: &[(&str, &str)] = &[
        (
            "figure1",
            "geography,date,percent_red,percent_red_lower,percent_red_upper,grocery_pharmacy,workplace,residential\n\
             Italy,2020-02-15,-0.05,-0.08,-0.02,-0.10,-0.20,0.05\n\
             Italy,2020-02-16,-0.25,-0.30,-0.20,-0.40,-0.55,0.18\n\
             Italy,2020-02-17,-0.10,-0.14,-0.06,-0.22,-0.35,0.11\n\
             Spain,2020-02-15,-0.02,-0.04,0.00,-0.05,-0.12,0.03\n\
             Spain,2020-02-16,-0.18,-0.22,-0.14,-0.30,-0.44,0.15\n",
        ),
        (
            "figure12_sip",
            "geography,date,SIP\n\
             Italy,2020-02-15,0\n\
             Italy,2020-02-16,2\n\
             Italy,2020-02-17,3\n\
             Spain,2020-02-15,0\n\
             Spain,2020-02-16,1\n",
        ),
        (
            "table1",
            "geography,variable,coefficient,p_value,standard_error\n\
             Italy,CI level 1,-0.08,0.01,0.02\n\
             Italy,CI level 2,-0.21,0.002,0.03\n\
             Spain,CI level 1,-0.05,0.04,0.02\n",
        ),
        (
            "figure2",
            "geography,date,percent_red,mars_elec,breakpoint,breakpoint_and_SIP_chg\n\
             Italy,2020-02-15,-0.05,-0.04,0,0\n\
             Italy,2020-02-16,-0.25,-0.22,1,1\n\
             Italy,2020-02-17,-0.10,-0.12,0,0\n\
             Italy,2020-02-18,-0.20,-0.19,1,1\n\
             Spain,2020-02-15,-0.02,-0.03,0,0\n\
             Spain,2020-02-16,-0.18,-0.16,0,0\n",
        ),
        (
            "table2",
            "geography,Term,Break Point,Date,Slope After\n\
             Italy,h(t-21),21,2020-03-07,-0.012\n\
             Italy,h(t-48),48,2020-04-03,0.004\n\
             Spain,h(t-25),25,2020-03-11,-0.009\n",
        ),
        (
            "table3",
            "geography,mobility_type_desc,coefficient,standard_error,p_value,R2,N\n\
             Italy,Workplace,0.31,0.04,0.001,0.68,92\n\
             Italy,Residential,-0.54,0.09,0.001,0.61,92\n\
             Spain,Workplace,0.27,0.05,0.002,0.64,92\n",
        ),
        (
            "table4",
            "geography,mobility_type_desc,coefficient,standard_error,p_value\n\
             Italy,Workplace,0.22,0.06,0.003\n\
             Italy,Transit,0.09,0.05,0.08\n\
             Spain,Workplace,0.19,0.07,0.01\n",
        ),
        (
            "figure3",
            "geography,Day.type,hour,load_median,load_Q10,load_Q90\n\
             Italy,weekend - Historic (April 2016-2019),0,24100,22000,26000\n\
             Italy,weekend - Historic (April 2016-2019),1,23200,21300,25000\n\
             Italy,workday - Historic (April 2016-2019),0,28500,26800,30400\n\
             Italy,workday - Historic (April 2016-2019),1,27600,26000,29500\n\
             Italy,workday - April 2020,0,22400,21000,23900\n\
             Italy,workday - April 2020,1,21700,20400,23100\n\
             Spain,workday - April 2020,0,20100,19000,21500\n",
        ),
        (
            "table5",
            "geography,type_desc,historic,actual\n\
             Italy,Peak load (MW),41200,33800\n\
             Italy,Baseload (MW),22100,19400\n\
             Spain,Peak load (MW),33500,28100\n",
        ),
    ];

    fn parse_cell(s: &str) -> CellValue {
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        CellValue::String(s.to_string())
    }

    fn parse_table(name: &str, text: &str) -> Table {
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let columns: Vec<String> = reader
            .headers()
            .unwrap()
            .iter()
            .map(|h| h.to_string())
            .collect();
        let records = reader
            .records()
            .map(|r| r.unwrap().iter().map(parse_cell).collect())
            .collect();
        let mut table = Table::from_rows(columns, records);
        table.coerce_date_column(name, "date").unwrap();
        table
    }

    pub fn sample_tables() -> BTreeMap<String, Table> {
        SAMPLE_CSVS
            .iter()
            .map(|(name, text)| (name.to_string(), parse_table(name, text)))
            .collect()
    }

    pub fn sample_store() -> DataStore {
        DataStore::new(sample_tables()).unwrap()
    }

    pub fn write_sample_csvs(dir: &Path) {
        assert_eq!(SAMPLE_CSVS.len(), SCHEMAS.len());
        for (name, text) in SAMPLE_CSVS {
            std::fs::write(dir.join(format!("{name}.csv")), text).unwrap();
        }
    }
}
