use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoints, PlotUi, Points, Polygon};

use crate::color::{ColorMap, DATE_LINE, SOURCE_BAR};
use crate::data::aggregate::AggregateTable;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 220.0;
const AXIS_LABEL_CHARS: usize = 14;

// ---------------------------------------------------------------------------
// Chart row (top of the central panel)
// ---------------------------------------------------------------------------

/// Sources, therapy areas and dates, side by side.
pub fn chart_row(ui: &mut Ui, state: &AppState) {
    let tables = &state.output.tables;
    ui.columns(3, |cols: &mut [Ui]| {
        sources_chart(&mut cols[0], &tables.sources);
        areas_chart(&mut cols[1], &tables.areas, &state.area_colors);
        dates_chart(&mut cols[2], &tables.dates);
    });
}

fn no_data(ui: &mut Ui) {
    ui.add_sized(
        [ui.available_width(), CHART_HEIGHT],
        eframe::egui::Label::new(RichText::new("No data").weak()),
    );
}

/// Category axis: tick `i` shows the `i`-th label, shortened.
fn category_formatter(labels: Vec<String>) -> impl Fn(GridMark, &std::ops::RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let v = mark.value;
        if v < 0.0 || v.fract() != 0.0 {
            return String::new();
        }
        labels
            .get(v as usize)
            .map(|l| shorten(l, AXIS_LABEL_CHARS))
            .unwrap_or_default()
    }
}

fn count_formatter(mark: GridMark, _range: &std::ops::RangeInclusive<f64>) -> String {
    if mark.value >= 0.0 && mark.value.fract() == 0.0 {
        format!("{}", mark.value as u64)
    } else {
        String::new()
    }
}

fn shorten(label: &str, max: usize) -> String {
    if label.chars().count() <= max {
        label.to_string()
    } else {
        let head: String = label.chars().take(max.saturating_sub(1)).collect();
        format!("{head}…")
    }
}

/// Bar/line plot with one category per integer x position.
fn show_category_plot(ui: &mut Ui, id: &str, labels: Vec<String>, add: impl FnOnce(&mut PlotUi)) {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_y(0.0)
        .show_grid([false, true])
        .x_axis_formatter(category_formatter(labels))
        .y_axis_formatter(count_formatter)
        .show(ui, |plot_ui| add(plot_ui));
}

// ---------------------------------------------------------------------------
// Individual charts
// ---------------------------------------------------------------------------

fn sources_chart(ui: &mut Ui, table: &AggregateTable) {
    ui.strong("Top sources");
    if table.is_empty() {
        no_data(ui);
        return;
    }

    let bars: Vec<Bar> = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, (label, count))| Bar::new(i as f64, *count as f64).name(label).fill(SOURCE_BAR))
        .collect();
    let labels = table.labels().into_iter().map(str::to_string).collect();

    show_category_plot(ui, "sources_chart", labels, |plot_ui| {
        plot_ui.bar_chart(BarChart::new(bars).width(0.7).name("Number of Articles"));
    });
}

fn dates_chart(ui: &mut Ui, table: &AggregateTable) {
    ui.strong("Articles by date");
    if table.is_empty() {
        no_data(ui);
        return;
    }

    let points: Vec<[f64; 2]> = table
        .counts()
        .into_iter()
        .enumerate()
        .map(|(i, count)| [i as f64, count as f64])
        .collect();
    let labels = table.labels().into_iter().map(str::to_string).collect();

    show_category_plot(ui, "dates_chart", labels, |plot_ui| {
        plot_ui.line(
            Line::new(PlotPoints::from(points.clone()))
                .name("Articles Published")
                .color(DATE_LINE)
                .width(2.0),
        );
        plot_ui.points(Points::new(PlotPoints::from(points)).radius(3.0).color(DATE_LINE));
    });
}

/// Pie slices as polygons; each slice is split into convex pieces of at
/// most a quarter turn.
fn areas_chart(ui: &mut Ui, table: &AggregateTable, colors: &ColorMap) {
    ui.strong("Therapy areas");
    let total = table.total();
    if total == 0 {
        no_data(ui);
        return;
    }

    let slices: Vec<(Vec<[f64; 2]>, Color32)> = pie_slices(table)
        .into_iter()
        .map(|(label, points)| (points, colors.color_for(label)))
        .collect();

    Plot::new("areas_chart")
        .height(CHART_HEIGHT - 40.0)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            for (points, color) in slices {
                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(points))
                        .fill_color(color)
                        .stroke(Stroke::new(1.0, Color32::WHITE)),
                );
            }
        });

    // Legend lists zero-count areas too.
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for (label, count) in &table.rows {
            ui.label(RichText::new("■").color(colors.color_for(label)));
            ui.label(RichText::new(format!("{label} ({count})")).small());
        }
    });
}

/// Unit-circle pieces per label, starting at twelve o'clock, clockwise.
fn pie_slices(table: &AggregateTable) -> Vec<(&str, Vec<[f64; 2]>)> {
    let total = table.total() as f64;
    let mut pieces = Vec::new();
    let mut start = FRAC_PI_2;

    for (label, count) in &table.rows {
        if *count == 0 {
            continue;
        }
        let end = start - TAU * (*count as f64) / total;
        let mut piece_start = start;
        while piece_start > end + 1e-9 {
            let piece_end = (piece_start - FRAC_PI_2).max(end);
            let steps = (((piece_start - piece_end) / 0.05).ceil() as usize).max(1);
            let mut points = vec![[0.0, 0.0]];
            points.extend((0..=steps).map(|s| {
                let a = piece_start + (piece_end - piece_start) * s as f64 / steps as f64;
                [a.cos(), a.sin()]
            }));
            pieces.push((label.as_str(), points));
            piece_start = piece_end;
        }
        start = end;
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[(&str, usize)]) -> AggregateTable {
        AggregateTable {
            rows: rows.iter().map(|(l, c)| (l.to_string(), *c)).collect(),
        }
    }

    #[test]
    fn slices_skip_zero_counts_and_stay_convex() {
        let t = table(&[("Onc", 3), ("Neuro", 0), ("CV", 1)]);
        let pieces = pie_slices(&t);

        assert!(pieces.iter().all(|(label, _)| *label != "Neuro"));
        // 270° for Onc needs three quarter-turn pieces, 90° for CV one.
        assert_eq!(pieces.iter().filter(|(l, _)| *l == "Onc").count(), 3);
        assert_eq!(pieces.iter().filter(|(l, _)| *l == "CV").count(), 1);
        for (_, points) in &pieces {
            assert_eq!(points[0], [0.0, 0.0]);
            for p in &points[1..] {
                assert!(((p[0] * p[0] + p[1] * p[1]).sqrt() - 1.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn single_area_fills_the_circle() {
        let t = table(&[("Onc", 5)]);
        let pieces = pie_slices(&t);
        assert_eq!(pieces.len(), 4);
        let last = pieces.last().unwrap().1.last().unwrap();
        assert!((last[0] - 0.0).abs() < 1e-9 && (last[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn axis_labels_are_shortened_and_integer_only() {
        let f = category_formatter(vec!["New England Journal of Medicine".to_string()]);
        let range = 0.0..=1.0;
        let mark = |value| GridMark { value, step_size: 1.0 };
        assert_eq!(f(mark(0.0), &range), "New England J…");
        assert_eq!(f(mark(0.5), &range), "");
        assert_eq!(f(mark(3.0), &range), "");
        assert_eq!(count_formatter(mark(2.0), &range), "2");
        assert_eq!(count_formatter(mark(2.5), &range), "");
    }
}
