use eframe::egui::{self, Align, Color32, Layout, RichText, ScrollArea, Ui};

use crate::color::ColorMap;
use crate::data::model::Article;
use crate::state::{AppState, LOAD_ERROR_MESSAGE};

const NO_MATCHES_MESSAGE: &str =
    "No articles found matching your filters. Try adjusting your search criteria.";

// ---------------------------------------------------------------------------
// Article list (central panel, below the charts)
// ---------------------------------------------------------------------------

pub fn article_list(ui: &mut Ui, state: &mut AppState) {
    if let Some(err) = &state.load_error {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(RichText::new(LOAD_ERROR_MESSAGE).color(Color32::RED))
                .on_hover_text(err.as_str());
        });
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        ui.heading("Articles");
        ui.label(format!("({})", state.output.visible.len()));
    });

    if state.output.visible.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(RichText::new(NO_MATCHES_MESSAGE).weak());
        });
        return;
    }

    let mut opened = None;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (index, article) in state.visible_articles() {
                ui.push_id(index, |ui: &mut Ui| {
                    if article_card(ui, article, &state.area_colors) {
                        opened = Some(index);
                    }
                });
                ui.add_space(6.0);
            }
        });

    if let Some(index) = opened {
        state.open_article(index);
    }
}

/// Missing titles show a placeholder rather than an empty link.
pub fn display_title(article: &Article) -> &str {
    if article.title.trim().is_empty() {
        "Untitled article"
    } else {
        &article.title
    }
}

/// Returns true when "Details" was clicked.
fn article_card(ui: &mut Ui, article: &Article, colors: &ColorMap) -> bool {
    let mut details = false;
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_width(ui.available_width());

        ui.horizontal(|ui: &mut Ui| {
            ui.hyperlink_to(RichText::new(display_title(article)).strong().size(15.0), &article.link);
            ui.with_layout(Layout::right_to_left(Align::TOP), |ui: &mut Ui| {
                ui.label(RichText::new(article.date.as_str()).weak());
            });
        });
        ui.label(RichText::new(article.journal.as_str()).italics());
        badges(ui, article, colors);

        if !article.summary.is_empty() {
            ui.add_space(4.0);
            ui.horizontal_wrapped(|ui: &mut Ui| {
                ui.strong("Summary:");
                ui.label(article.summary.as_str());
            });
        }

        if !article.takeaways.is_empty() {
            ui.strong("Key Takeaways:");
            for line in article.takeaway_lines() {
                ui.label(format!("• {line}"));
            }
        }

        ui.horizontal(|ui: &mut Ui| {
            if ui.button("Details").clicked() {
                details = true;
            }
            ui.hyperlink_to("Read original article", &article.link);
        });
    });
    details
}

/// Therapy areas as coloured badges, terms as plain ones.
pub fn badges(ui: &mut Ui, article: &Article, colors: &ColorMap) {
    let term_bg = ui.visuals().faint_bg_color;
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for area in &article.therapy_areas {
            ui.label(
                RichText::new(format!(" {area} "))
                    .small()
                    .color(Color32::WHITE)
                    .background_color(colors.color_for(area)),
            );
        }
        for term in &article.terms {
            ui.label(RichText::new(format!(" {term} ")).small().background_color(term_bg));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn placeholder_for_missing_title() {
        let untitled: Article = serde_json::from_value(json!({ "title": "  " })).unwrap();
        let titled: Article = serde_json::from_value(json!({ "title": "PD-1" })).unwrap();
        assert_eq!(display_title(&untitled), "Untitled article");
        assert_eq!(display_title(&titled), "PD-1");
    }
}
