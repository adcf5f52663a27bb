use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{panels, plot, table};
use crate::views::ViewBundle;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// One pass over the section layout of the source dashboard: Fig. 1 and
    /// Table 1 full width, Fig. 2 / Table 2 and Fig. 3 / Table 5 as
    /// two-column rows, Tables 3 and 4 full width between them.
    fn dashboard(ui: &mut Ui, views: &ViewBundle) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui: &mut Ui| {
                ui.vertical_centered(|ui: &mut Ui| {
                    ui.heading("Supplemental Data");
                });
                ui.separator();

                plot::chart(ui, &views.figure1_ci);
                plot::chart(ui, &views.figure1_ts);
                panels::caption(
                    ui,
                    "Fig. 1:",
                    "Government restrictions (CI levels) and percent change in \
                     mobility, electricity demand, Feb-May 2020",
                );

                ui.add_space(16.0);
                table::data_table(ui, &views.table1);
                panels::caption(
                    ui,
                    "Table 1:",
                    "Ordinary least squares regression model of daily electricity \
                     change and government restrictions (CI level), Feb-May 2020",
                );
                ui.separator();

                ui.columns(2, |cols: &mut [Ui]| {
                    plot::chart(&mut cols[0], &views.figure2_ci);
                    plot::chart(&mut cols[0], &views.figure2_ts);
                    panels::caption(
                        &mut cols[0],
                        "Fig. 2:",
                        "Multivariate Adaptive Regression Spline (MARS) model results \
                         of daily electricity change and government restrictions (CI \
                         level) vs. actual daily electricity change, Feb-May 2020",
                    );

                    table::data_table(&mut cols[1], &views.table2);
                    panels::caption(&mut cols[1], "Table 2:", "Coefficients for the MARS model");
                });
                ui.separator();

                table::data_table(ui, &views.table3);
                panels::caption(
                    ui,
                    "Table 3:",
                    "Elasticity coefficients measuring the relationship between \
                     changes in workplace, transit, residential, retail/recreation, \
                     grocery/pharmacy and parks mobility and changes electricity use, \
                     Feb-May 2020.",
                );

                ui.add_space(16.0);
                table::data_table(ui, &views.table4);
                panels::caption(
                    ui,
                    "Table 4:",
                    "Regression of changes in electricity use on changes in \
                     workplace, transit, residential, retail/recreation, \
                     grocery/pharmacy and parks mobility all together in one model, \
                     Feb-May 2020.",
                );
                ui.separator();

                ui.columns(2, |cols: &mut [Ui]| {
                    plot::chart(&mut cols[0], &views.figure3);
                    panels::caption(
                        &mut cols[0],
                        "Fig. 3:",
                        "Observed daily load shapes for workdays and weekends April \
                         2016-2019 vs. April 2020.",
                    );

                    table::data_table(&mut cols[1], &views.table5);
                    panels::caption(
                        &mut cols[1],
                        "Table 5:",
                        "Changes in peak and baseload (MW, timing) for workdays April \
                         2016-2019 vs. April 2020.",
                    );
                });
            });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar and selector ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: the filtered figures and tables ----
        egui::CentralPanel::default().show(ctx, |ui| match &self.state.views {
            Some(views) => Self::dashboard(ui, views),
            None => {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading("Open a data folder to view the study results  (File → Open data folder…)");
                });
            }
        });
    }
}
