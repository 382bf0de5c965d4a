use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::dimension::Dimension;
use crate::data::model::FieldValue;
use crate::data::store::DatasetStore;
use crate::state::AppState;
use crate::stats::summary::format_count;

/// A click in the filter panel, applied once the panel is drawn.
enum FilterAction {
    Toggle(Dimension, FieldValue),
    Clear(Dimension),
}

// ---------------------------------------------------------------------------
// Left side panel – cascading filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
///
/// Each dimension lists only the values its upstream filters leave over, in
/// cascade order. Nothing ticked means "All".
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    let mut action = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for opts in &state.outcome.options {
                let dim = opts.dimension;
                let header_text = if opts.selected.is_empty() {
                    format!("{}  (All {})", dim.label(), opts.candidates.len())
                } else {
                    format!(
                        "{}  ({}/{})",
                        dim.label(),
                        opts.selected.len(),
                        opts.candidates.len()
                    )
                };

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(dim.column_name())
                    .default_open(dim == Dimension::Brand)
                    .show(ui, |ui: &mut Ui| {
                        if opts.candidates.is_empty() {
                            ui.weak("No values left");
                            return;
                        }
                        if !opts.selected.is_empty() && ui.small_button("Clear (All)").clicked() {
                            action = Some(FilterAction::Clear(dim));
                        }

                        for val in &opts.candidates {
                            let mut text = RichText::new(val.to_string());
                            if let Some(cm) = state.color_map.as_ref().filter(|cm| cm.dimension == dim) {
                                text = text.color(cm.color_for(val));
                            }

                            let mut checked = opts.is_selected(val);
                            if ui.checkbox(&mut checked, text).changed() {
                                action = Some(FilterAction::Toggle(dim, val.clone()));
                            }
                        }
                    });
            }
        });

    match action {
        Some(FilterAction::Toggle(dim, value)) => state.toggle_value(dim, &value),
        Some(FilterAction::Clear(dim)) => state.clear_dimension(dim),
        None => {}
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} listings loaded, {} visible",
                format_count(ds.len()),
                format_count(state.outcome.visible.len())
            ));

            ui.separator();

            let restricted = !state.outcome.selection.is_unrestricted();
            if ui
                .add_enabled(restricted, egui::Button::new("Clear filters"))
                .clicked()
            {
                state.clear_all();
            }
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

/// Pick another listings file. Every file opened this way starts a new session.
pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open vehicle listings")
        .add_filter("Supported files", &["csv", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_store(&DatasetStore::new(path));
    }
}
