use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::dimension::Dimension;
use crate::data::model::Record;
use crate::state::AppState;
use crate::stats::summary::format_price;

const ROW_HEIGHT: f32 = 18.0;

/// Scrollable table of the listings that pass the filters.
pub fn listings_table(ui: &mut Ui, state: &AppState) {
    let Some(view) = state.view() else {
        return;
    };

    ui.collapsing(format!("Listings ({})", view.len()), |ui: &mut Ui| {
        ui.push_id("listings_table", |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .max_scroll_height(320.0)
                .columns(Column::auto().resizable(true), Dimension::ALL.len())
                .column(Column::auto())
                .column(Column::remainder())
                .header(ROW_HEIGHT + 2.0, |mut header| {
                    for dim in Dimension::ALL {
                        header.col(|ui| {
                            ui.strong(dim.column_name());
                        });
                    }
                    header.col(|ui| {
                        ui.strong("Price");
                    });
                    header.col(|ui| {
                        ui.strong("Mileage");
                    });
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, view.len(), |mut row| {
                        let Some(rec) = view.get(row.index()) else {
                            return;
                        };
                        for dim in Dimension::ALL {
                            row.col(|ui| {
                                ui.label(cell_text(rec, dim));
                            });
                        }
                        row.col(|ui| {
                            ui.label(format_price(rec.price));
                        });
                        row.col(|ui| {
                            ui.label(rec.mileage.map_or_else(String::new, |m| format!("{m:.0}")));
                        });
                    });
                });
        });
    });
}

fn cell_text(rec: &Record, dim: Dimension) -> String {
    let value = rec.field(dim);
    if value.is_missing() {
        String::new()
    } else {
        value.to_string()
    }
}
