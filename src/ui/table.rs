use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::views::table::TableSpec;

// ---------------------------------------------------------------------------
// TableSpec → egui_extras table
// ---------------------------------------------------------------------------

/// Render one table payload. An unmatched selector produces headers with no
/// rows, mirroring the blank tables of the source dashboard.
pub fn data_table(ui: &mut Ui, spec: &TableSpec) {
    if spec.columns.is_empty() {
        return;
    }
    // The page itself scrolls; the table must not.
    ui.push_id(spec.id, |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(false)
            .vscroll(false)
            .columns(Column::remainder(), spec.columns.len())
            .header(22.0, |mut header| {
                for name in &spec.columns {
                    header.col(|ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|mut body| {
                for record in &spec.rows {
                    body.row(20.0, |mut row| {
                        for cell in record {
                            row.col(|ui| {
                                ui.label(cell);
                            });
                        }
                    });
                }
            });
    });
}
