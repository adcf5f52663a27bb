use chrono::{Datelike, NaiveDate};
use eframe::egui::Color32;

use crate::color;
use crate::data::filter::filter_eq;
use crate::data::model::{CellValue, DataStore, Table, KEY_COLUMN};

// ---------------------------------------------------------------------------
// Chart payloads
// ---------------------------------------------------------------------------

/// What the x axis measures, so the renderer can pick tick formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XAxis {
    Date,
    Hour,
}

/// Tick formatting for the y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YFormat {
    /// Fractions shown as percentages (`-0.25` → `-25%`).
    Percent,
    /// Thousands separators for absolute load values.
    Thousands,
    Plain,
}

/// One drawable element of a chart. Items without a `name` stay out of the
/// legend (band edges, repeated marker segments).
#[derive(Debug, Clone, PartialEq)]
pub enum ChartItem {
    Line {
        name: Option<String>,
        color: Color32,
        dashed: bool,
        points: Vec<[f64; 2]>,
    },
    /// Shaded region between two series sharing an x grid.
    Band {
        color: Color32,
        dashed_edges: bool,
        lower: Vec<[f64; 2]>,
        upper: Vec<[f64; 2]>,
    },
    Markers {
        name: Option<String>,
        color: Color32,
        points: Vec<[f64; 2]>,
    },
    /// Vertical segment at `x` spanning `y_min..y_max`.
    VSegment {
        name: Option<String>,
        color: Color32,
        x: f64,
        y_min: f64,
        y_max: f64,
    },
}

/// A complete chart description: items plus axis hints. Plain data, no UI
/// handles, so the builders are testable headless.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub id: &'static str,
    pub x_axis: XAxis,
    pub x_label: &'static str,
    /// The CI-level charts sit flush above a time-series chart sharing the
    /// same date range, so their own x axis stays hidden.
    pub x_visible: bool,
    pub y_label: &'static str,
    pub y_format: YFormat,
    /// Fixed integer tick values (the CI level axis shows exactly 0..=3).
    pub y_ticks: Option<&'static [f64]>,
    /// Height hint in points, carried over from the source layout.
    pub height: f32,
    pub items: Vec<ChartItem>,
}

impl ChartSpec {
    /// Count of vertical marker segments (regime-change indicators).
    pub fn segment_count(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i, ChartItem::VSegment { .. }))
            .count()
    }
}

const CI_TICKS: &[f64] = &[0.0, 1.0, 2.0, 3.0];

// ---------------------------------------------------------------------------
// Axis value helpers
// ---------------------------------------------------------------------------

/// Plot-space x for a calendar date (days since CE, matching [`day_label`]).
pub fn day_number(d: NaiveDate) -> f64 {
    d.num_days_from_ce() as f64
}

/// Inverse of [`day_number`], for tick labels.
pub fn day_label(x: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
        .map(|d| d.format("%b %d").to_string())
        .unwrap_or_default()
}

fn x_of(cell: &CellValue) -> Option<f64> {
    cell.as_date().map(day_number).or_else(|| cell.as_f64())
}

/// Paired (x, y) points for the given rows; rows with a null or non-numeric
/// cell on either axis are skipped.
fn xy_series(table: &Table, rows: &[usize], x_col: &str, y_col: &str) -> Vec<[f64; 2]> {
    rows.iter()
        .filter_map(|&r| {
            let x = table.cell(r, x_col).and_then(x_of)?;
            let y = table.cell(r, y_col).and_then(CellValue::as_f64)?;
            Some([x, y])
        })
        .collect()
}

/// The upstream indicator columns hold 0/1 (as int or float, depending on the
/// writer).
fn flag_set(cell: Option<&CellValue>) -> bool {
    cell.and_then(CellValue::as_f64) == Some(1.0)
}

// ---------------------------------------------------------------------------
// Figure builders
// ---------------------------------------------------------------------------

/// Government-restriction (CI level) step series, shown above both time-series
/// figures. `id`/`height` differ between the two placements.
pub fn ci_chart(store: &DataStore, geography: &str, id: &'static str, height: f32) -> ChartSpec {
    let mut items = Vec::new();
    if let Some(table) = store.table("figure12_sip") {
        let rows = filter_eq(table, KEY_COLUMN, geography);
        items.push(ChartItem::Line {
            name: Some("CI Level".to_string()),
            color: color::BLACK,
            dashed: false,
            points: xy_series(table, &rows, "date", "SIP"),
        });
    }
    ChartSpec {
        id,
        x_axis: XAxis::Date,
        x_label: "",
        x_visible: false,
        y_label: "CI Level",
        y_format: YFormat::Plain,
        y_ticks: Some(CI_TICKS),
        height,
        items,
    }
}

/// Figure 1: electricity demand change with its confidence band, plus the
/// three mobility series.
pub fn demand_mobility_chart(store: &DataStore, geography: &str) -> ChartSpec {
    let mut items = Vec::new();
    if let Some(table) = store.table("figure1") {
        let rows = filter_eq(table, KEY_COLUMN, geography);
        items.push(ChartItem::Band {
            color: color::YELLOW,
            dashed_edges: false,
            lower: xy_series(table, &rows, "date", "percent_red_lower"),
            upper: xy_series(table, &rows, "date", "percent_red_upper"),
        });
        items.push(ChartItem::Line {
            name: Some("Elect. use chg".to_string()),
            color: color::ORANGE,
            dashed: true,
            points: xy_series(table, &rows, "date", "percent_red"),
        });
        for (column, label, c) in [
            ("grocery_pharmacy", "Grocery/Pharmacy", color::LIGHT_GREEN),
            ("workplace", "Workplace", color::DARK_BLUE),
            ("residential", "Residential", color::MEDIUM_TURQUOISE),
        ] {
            items.push(ChartItem::Line {
                name: Some(label.to_string()),
                color: c,
                dashed: false,
                points: xy_series(table, &rows, "date", column),
            });
        }
    }
    ChartSpec {
        id: "figure1_ts",
        x_axis: XAxis::Date,
        x_label: "",
        x_visible: true,
        y_label: "% change",
        y_format: YFormat::Percent,
        y_ticks: None,
        height: 500.0,
        items,
    }
}

/// Figure 2: observed demand change vs. the spline model fit, with breakpoint
/// markers and one vertical segment per breakpoint that coincided with a CI
/// change. Each segment spans the observed min..max of the demand series; no
/// flagged rows means no segments.
pub fn spline_fit_chart(store: &DataStore, geography: &str) -> ChartSpec {
    let mut items = Vec::new();
    if let Some(table) = store.table("figure2") {
        let rows = filter_eq(table, KEY_COLUMN, geography);
        let observed = xy_series(table, &rows, "date", "percent_red");

        items.push(ChartItem::Line {
            name: Some("Elect. use chg".to_string()),
            color: color::CORNFLOWER_BLUE,
            dashed: false,
            points: observed.clone(),
        });
        items.push(ChartItem::Line {
            name: Some("MARS fit".to_string()),
            color: color::ORANGE,
            dashed: false,
            points: xy_series(table, &rows, "date", "mars_elec"),
        });

        let breakpoint_rows: Vec<usize> = rows
            .iter()
            .copied()
            .filter(|&r| flag_set(table.cell(r, "breakpoint")))
            .collect();
        items.push(ChartItem::Markers {
            name: Some("Break Point".to_string()),
            color: color::RED,
            points: xy_series(table, &breakpoint_rows, "date", "mars_elec"),
        });

        // Vertical min..max segments where a breakpoint lines up with a CI
        // change. Only the first carries a legend entry.
        let segment_xs: Vec<f64> = rows
            .iter()
            .filter(|&&r| flag_set(table.cell(r, "breakpoint_and_SIP_chg")))
            .filter_map(|&r| table.cell(r, "date").and_then(x_of))
            .collect();
        let y_min = observed.iter().map(|p| p[1]).fold(f64::INFINITY, f64::min);
        let y_max = observed
            .iter()
            .map(|p| p[1])
            .fold(f64::NEG_INFINITY, f64::max);
        if !observed.is_empty() {
            for (i, x) in segment_xs.into_iter().enumerate() {
                items.push(ChartItem::VSegment {
                    name: (i == 0).then(|| "CI Change".to_string()),
                    color: color::MEDIUM_SEA_GREEN,
                    x,
                    y_min,
                    y_max,
                });
            }
        }
    }
    ChartSpec {
        id: "figure2_ts",
        x_axis: XAxis::Date,
        x_label: "",
        x_visible: true,
        y_label: "% change elect. demand",
        y_format: YFormat::Percent,
        y_ticks: None,
        height: 400.0,
        items,
    }
}

// Day-type labels as the upstream pipeline writes them.
pub const WEEKEND_HISTORIC: &str = "weekend - Historic (April 2016-2019)";
pub const WORKDAY_HISTORIC: &str = "workday - Historic (April 2016-2019)";
pub const WORKDAY_CURRENT: &str = "workday - April 2020";

/// Figure 3: hourly load shapes. Three day-type subsets, each a median line
/// with a Q10..Q90 shaded band; the weekend series is dashed, the current
/// workday is red.
pub fn load_shape_chart(store: &DataStore, geography: &str) -> ChartSpec {
    let mut items = Vec::new();
    if let Some(table) = store.table("figure3") {
        let rows = filter_eq(table, KEY_COLUMN, geography);
        for (day_type, label, c, dashed) in [
            (
                WEEKEND_HISTORIC,
                "weekend \u{2212} Historic (April 2016\u{2212}2019)",
                color::CORNFLOWER_BLUE,
                true,
            ),
            (
                WORKDAY_HISTORIC,
                "working day \u{2212} Historic (April 2016\u{2212}2019)",
                color::CORNFLOWER_BLUE,
                false,
            ),
            (
                WORKDAY_CURRENT,
                "working day \u{2212} April 2020",
                color::RED,
                false,
            ),
        ] {
            let subset: Vec<usize> = rows
                .iter()
                .copied()
                .filter(|&r| {
                    table
                        .cell(r, "Day.type")
                        .and_then(CellValue::as_str)
                        .is_some_and(|v| v == day_type)
                })
                .collect();
            items.push(ChartItem::Band {
                color: c,
                dashed_edges: dashed,
                lower: xy_series(table, &subset, "hour", "load_Q10"),
                upper: xy_series(table, &subset, "hour", "load_Q90"),
            });
            items.push(ChartItem::Line {
                name: Some(label.to_string()),
                color: c,
                dashed,
                points: xy_series(table, &subset, "hour", "load_median"),
            });
        }
    }
    ChartSpec {
        id: "figure3",
        x_axis: XAxis::Hour,
        x_label: "Hour of day",
        x_visible: true,
        y_label: "Load (MW)",
        y_format: YFormat::Thousands,
        y_ticks: None,
        height: 450.0,
        items,
    }
}
