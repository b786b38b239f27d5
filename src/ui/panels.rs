use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::filter::SortOrder;
use crate::data::model::{Digest, KeyHighlights};
use crate::export::export_csv;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Search ----
            ui.strong("Search");
            let mut search = state.criteria.search_text.clone();
            let response = ui.add(
                egui::TextEdit::singleline(&mut search)
                    .hint_text("Search articles…")
                    .desired_width(f32::INFINITY),
            );
            if response.changed() {
                state.set_search_text(&search);
            }
            ui.add_space(6.0);

            // ---- Therapy area ----
            ui.strong("Therapy area");
            let current_area = state.criteria.therapy_area.clone();
            let mut picked_area = None;
            egui::ComboBox::from_id_salt("therapy_area")
                .selected_text(current_area.label())
                .width(ui.available_width())
                .show_ui(ui, |ui: &mut Ui| {
                    for option in &state.therapy_area_options {
                        if ui
                            .selectable_label(*option == current_area, option.label())
                            .clicked()
                        {
                            picked_area = Some(option.clone());
                        }
                    }
                });
            if let Some(area) = picked_area {
                state.set_therapy_area(area);
            }
            ui.add_space(6.0);

            // ---- Term (entries outside the chosen area are disabled) ----
            ui.strong("Term");
            let current_term = state.criteria.term.clone();
            let mut picked_term = None;
            egui::ComboBox::from_id_salt("term")
                .selected_text(current_term.label())
                .width(ui.available_width())
                .show_ui(ui, |ui: &mut Ui| {
                    for option in &state.term_options {
                        let enabled = state.is_term_available(option);
                        let label = egui::SelectableLabel::new(*option == current_term, option.label());
                        if ui.add_enabled(enabled, label).clicked() {
                            picked_term = Some(option.clone());
                        }
                    }
                });
            if let Some(term) = picked_term {
                state.set_term(term);
            }
            ui.add_space(6.0);

            // ---- Sort ----
            ui.strong("Sort");
            let current_sort = state.criteria.sort_order;
            egui::ComboBox::from_id_salt("sort_order")
                .selected_text(current_sort.label())
                .width(ui.available_width())
                .show_ui(ui, |ui: &mut Ui| {
                    for order in SortOrder::ALL {
                        if ui
                            .selectable_label(order == current_sort, order.label())
                            .clicked()
                        {
                            state.set_sort_order(order);
                        }
                    }
                });
            ui.add_space(6.0);

            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }

            if let Some(highlights) = state.dataset.as_ref().and_then(|d| d.key_highlights.as_ref()) {
                ui.separator();
                key_highlights(ui, highlights, state);
            }
        });
}

fn key_highlights(ui: &mut Ui, h: &KeyHighlights, state: &AppState) {
    egui::CollapsingHeader::new(RichText::new("Key highlights").strong())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            if !h.summary.is_empty() {
                ui.label(h.summary.as_str());
            }
            bullet_list(ui, "Trends", &h.trends);
            bullet_list(ui, "Technologies", &h.technologies);

            if !h.therapy_area_distribution.is_empty() {
                ui.add_space(4.0);
                ui.strong("Therapy area distribution");
                TableBuilder::new(ui)
                    .striped(true)
                    .vscroll(false)
                    .column(Column::remainder())
                    .column(Column::auto())
                    .header(18.0, |mut header| {
                        header.col(|ui| {
                            ui.label("Area");
                        });
                        header.col(|ui| {
                            ui.label("Articles");
                        });
                    })
                    .body(|mut body| {
                        for (area, count) in &h.therapy_area_distribution {
                            body.row(18.0, |mut row| {
                                row.col(|ui| {
                                    let color = state.area_colors.color_for(area);
                                    ui.label(RichText::new(area.as_str()).color(color));
                                });
                                row.col(|ui| {
                                    ui.label(count.to_string());
                                });
                            });
                        }
                    });
            }
            ui.label(format!("Total articles: {}", h.total_articles));
        });
}

fn bullet_list(ui: &mut Ui, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    ui.add_space(4.0);
    ui.strong(heading);
    for item in items {
        ui.label(format!("• {item}"));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / header.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = !state.output.visible.is_empty();
            if ui
                .add_enabled(can_export, egui::Button::new("Export visible as CSV…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.strong("Literature Digest");

        if let Some(updated) = state.dataset.as_ref().and_then(Digest::last_updated_label) {
            ui.label(RichText::new(updated).weak());
        }

        ui.separator();
        let counter = ui.label(state.showing_label());
        if let Some(source) = &state.source {
            counter.on_hover_text(format!("Loaded from {source}"));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg.as_str()).weak());
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open digest")
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path.to_string_lossy());
    }
}

pub fn export_dialog(state: &mut AppState) {
    let Some(path) = rfd::FileDialog::new()
        .set_title("Export visible articles")
        .add_filter("CSV", &["csv"])
        .set_file_name("articles.csv")
        .save_file()
    else {
        return;
    };

    let result = export_csv(&path, state.visible_articles().map(|(_, a)| a));
    state.status_message = Some(match result {
        Ok(rows) => format!("Exported {rows} articles to {}", path.display()),
        Err(e) => {
            log::error!("Export failed: {e:#}");
            format!("Export failed: {e:#}")
        }
    });
}
