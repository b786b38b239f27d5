use eframe::egui::{self, Align2, RichText, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::cards::{badges, display_title};

// ---------------------------------------------------------------------------
// Article detail window
// ---------------------------------------------------------------------------

/// Show the selected article, if any. Escape, the title-bar cross and the
/// Close button all dismiss it.
pub fn article_detail(ctx: &egui::Context, state: &mut AppState) {
    let Some(article) = state.selected() else {
        return;
    };

    let mut open = true;
    let mut close_clicked = ctx.input(|i| i.key_pressed(egui::Key::Escape));

    egui::Window::new(RichText::new(display_title(article)).strong())
        .id(egui::Id::new("article_detail"))
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .default_width(560.0)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui: &mut Ui| {
            ui.horizontal_wrapped(|ui: &mut Ui| {
                ui.label(RichText::new(article.journal.as_str()).italics());
                ui.label("·");
                ui.label(RichText::new(article.date.as_str()).weak());
            });
            if let Some(authors) = &article.authors {
                ui.label(RichText::new(authors.as_str()).small());
            }
            badges(ui, article, &state.area_colors);
            ui.separator();

            ScrollArea::vertical().max_height(420.0).show(ui, |ui: &mut Ui| {
                section(ui, "Description", &article.description);
                section(ui, "Summary", &article.summary);

                if !article.takeaways.is_empty() {
                    ui.add_space(4.0);
                    ui.strong("Key Takeaways");
                    for line in article.takeaway_lines() {
                        ui.label(format!("• {line}"));
                    }
                }
            });

            ui.separator();
            ui.horizontal(|ui: &mut Ui| {
                ui.hyperlink_to("Read Original", &article.link);
                if ui.button("Close").clicked() {
                    close_clicked = true;
                }
            });
        });

    if !open || close_clicked {
        state.close_article();
    }
}

fn section(ui: &mut Ui, heading: &str, text: &str) {
    if text.is_empty() {
        return;
    }
    ui.add_space(4.0);
    ui.strong(heading);
    ui.label(text);
}
