use eframe::egui::{self, Color32, RichText, Ui};

use crate::export;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar – title, selector, data actions, status
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar. The geography dropdown here is the single
/// control driving every view below it.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                open_data_dialog(state);
                ui.close_menu();
            }
            let loaded = state.store.is_some();
            if ui
                .add_enabled(loaded, egui::Button::new("Export all data…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.strong("Supplemental Data");
        ui.separator();

        // Clone the domain so the selection can mutate state inside the loop.
        let geographies: Vec<String> = state
            .store
            .as_ref()
            .map(|s| s.geographies().to_vec())
            .unwrap_or_default();

        if geographies.is_empty() {
            ui.label("No data loaded.");
        } else {
            ui.label("Geography:");
            let current = state.selected_geography.clone().unwrap_or_default();
            egui::ComboBox::from_id_salt("geography_dropdown")
                .selected_text(&current)
                .show_ui(ui, |ui: &mut Ui| {
                    for geo in &geographies {
                        if ui.selectable_label(current == *geo, geo).clicked() {
                            state.select_geography(geo.clone());
                        }
                    }
                });

            if let Some(store) = &state.store {
                ui.separator();
                ui.label(format!(
                    "{} datasets, {} rows",
                    store.dataset_count(),
                    store.total_rows()
                ));
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

/// Figure/table caption: bold lead ("Fig. 1:") followed by the description.
pub fn caption(ui: &mut Ui, lead: &str, text: &str) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.strong(lead);
        ui.label(text);
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_data_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open study data folder")
        .pick_folder();

    if let Some(dir) = folder {
        state.load_data_dir(&dir);
    }
}

fn export_dialog(state: &mut AppState) {
    let Some(store) = &state.store else {
        return;
    };

    let target = rfd::FileDialog::new()
        .set_title("Export all data")
        .set_file_name("study-data.zip")
        .add_filter("Zip archive", &["zip"])
        .save_file();

    if let Some(path) = target {
        match export::export_zip(store, &path) {
            Ok(()) => {
                state.status_message = Some(format!("Exported to {}", path.display()));
            }
            Err(e) => {
                log::error!("export failed: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
