use crate::color::ColorMap;
use crate::data::filter::{
    apply, available_terms, available_therapy_areas, FilterCriteria, FilterOutput, Selection,
    SortOrder,
};
use crate::data::loader::{load_source, LoadFailure};
use crate::data::model::{Article, Digest};

/// Shown in place of the article list when the digest cannot be loaded.
pub const LOAD_ERROR_MESSAGE: &str = "Error loading data. Please try again later.";

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Every criteria change goes through one of the `set_*` methods, which
/// recompute the derived output in full.
#[derive(Default)]
pub struct AppState {
    /// Loaded digest (None until a load succeeds).
    pub dataset: Option<Digest>,

    /// Where the current digest came from.
    pub source: Option<String>,

    /// Active filter criteria.
    pub criteria: FilterCriteria,

    /// Visible articles and chart tables for `criteria`.
    pub output: FilterOutput,

    /// Therapy-area dropdown entries.
    pub therapy_area_options: Vec<Selection>,

    /// Every term; entries not in `available_terms` are shown disabled.
    pub term_options: Vec<Selection>,

    /// Terms selectable under the current therapy area.
    pub available_terms: Vec<Selection>,

    /// Article shown in the detail window.
    pub selected_article: Option<usize>,

    /// Therapy-area colours shared by badges and the pie chart.
    pub area_colors: ColorMap,

    /// Set when the last load failed.
    pub load_error: Option<String>,

    /// Transient status line (exports and the like).
    pub status_message: Option<String>,
}

impl AppState {
    /// Load from a file path or URL, replacing the current digest on success.
    pub fn load(&mut self, source: &str) {
        match load_source(source) {
            Ok(digest) => {
                log::info!("Loaded {} articles from {source}", digest.len());
                self.set_dataset(digest, source);
            }
            Err(e) => self.load_failed(source, &e),
        }
    }

    /// Ingest a newly loaded digest and reset the criteria.
    pub fn set_dataset(&mut self, digest: Digest, source: &str) {
        let known = digest.known_areas().unwrap_or_default();
        self.area_colors = ColorMap::new(digest.therapy_areas.iter().chain(known.iter()));
        self.therapy_area_options = available_therapy_areas(&digest);
        self.term_options = available_terms(&digest, &Selection::All);

        self.dataset = Some(digest);
        self.source = Some(source.to_string());
        self.criteria = FilterCriteria::default();
        self.selected_article = None;
        self.load_error = None;
        self.status_message = None;
        self.refresh_terms();
        self.refilter();
    }

    /// Drop any digest; the filter controls keep working on an empty set.
    pub fn load_failed(&mut self, source: &str, err: &LoadFailure) {
        log::error!("Error loading data from {source}: {err}");
        *self = AppState {
            load_error: Some(err.to_string()),
            ..AppState::default()
        };
        self.refresh_terms();
        self.refilter();
    }

    /// Recompute `output` from the current criteria.
    pub fn refilter(&mut self) {
        self.output = match &self.dataset {
            Some(ds) => apply(ds, &self.criteria),
            None => FilterOutput::default(),
        };
    }

    fn refresh_terms(&mut self) {
        self.available_terms = match &self.dataset {
            Some(ds) => available_terms(ds, &self.criteria.therapy_area),
            None => vec![Selection::All],
        };
    }

    pub fn set_search_text(&mut self, text: &str) {
        self.criteria.search_text = text.to_string();
        log::debug!("search text -> {text:?}");
        self.refilter();
    }

    /// Picking an area always resets the term to `All`.
    pub fn set_therapy_area(&mut self, area: Selection) {
        log::debug!("therapy area -> {area}");
        self.criteria.therapy_area = area;
        self.refresh_terms();
        self.criteria.term = Selection::All;
        self.refilter();
    }

    /// Unavailable terms are ignored.
    pub fn set_term(&mut self, term: Selection) {
        if !self.available_terms.contains(&term) {
            log::debug!("ignoring unavailable term {term}");
            return;
        }
        log::debug!("term -> {term}");
        self.criteria.term = term;
        self.refilter();
    }

    pub fn set_sort_order(&mut self, order: SortOrder) {
        log::debug!("sort order -> {order:?}");
        self.criteria.sort_order = order;
        self.refilter();
    }

    pub fn reset_filters(&mut self) {
        self.criteria = FilterCriteria::default();
        self.refresh_terms();
        self.refilter();
    }

    pub fn is_term_available(&self, term: &Selection) -> bool {
        self.available_terms.contains(term)
    }

    /// Visible articles paired with their index in the digest.
    pub fn visible_articles(&self) -> impl Iterator<Item = (usize, &Article)> {
        let articles = self.dataset.as_ref().map(|d| d.articles.as_slice()).unwrap_or(&[]);
        self.output.visible.iter().map(move |&i| (i, &articles[i]))
    }

    pub fn total_count(&self) -> usize {
        self.dataset.as_ref().map_or(0, Digest::len)
    }

    pub fn showing_label(&self) -> String {
        format!(
            "Showing {} of {} articles",
            self.output.visible.len(),
            self.total_count()
        )
    }

    // -- Detail window --

    pub fn open_article(&mut self, index: usize) {
        if index < self.total_count() {
            self.selected_article = Some(index);
        }
    }

    pub fn close_article(&mut self) {
        self.selected_article = None;
    }

    pub fn selected(&self) -> Option<&Article> {
        let index = self.selected_article?;
        self.dataset.as_ref()?.articles.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_fixtures::{ids, three_articles};

    fn loaded() -> AppState {
        let mut state = AppState::default();
        state.set_dataset(three_articles(), "fixture");
        state
    }

    fn visible_ids(state: &AppState) -> Vec<String> {
        ids(state.dataset.as_ref().unwrap(), &state.output.visible)
    }

    #[test]
    fn initial_state_shows_everything() {
        let state = loaded();
        assert_eq!(visible_ids(&state), ["C", "B", "A"]);
        assert_eq!(state.showing_label(), "Showing 3 of 3 articles");
        assert_eq!(state.output.tables.areas.total(), 4);
        assert_eq!(state.therapy_area_options.len(), 3);
    }

    #[test]
    fn picking_area_resets_term_and_narrows_available_terms() {
        let mut state = loaded();
        state.set_term("Y".into());
        assert_eq!(visible_ids(&state), ["B"]);

        state.set_therapy_area("Onc".into());
        assert_eq!(state.criteria.term, Selection::All);
        assert_eq!(visible_ids(&state), ["B", "A"]);
        assert!(state.is_term_available(&"X".into()));

        state.set_term("Y".into());
        assert_eq!(visible_ids(&state), ["B"]);
    }

    #[test]
    fn unavailable_term_is_ignored() {
        let mut state = loaded();
        state.set_therapy_area("Onc".into());
        state.set_term("Nope".into());
        assert_eq!(state.criteria.term, Selection::All);
    }

    #[test]
    fn search_and_sort_recompute() {
        let mut state = loaded();
        state.set_sort_order(SortOrder::Oldest);
        assert_eq!(visible_ids(&state), ["A", "B", "C"]);

        state.set_search_text("Statin");
        assert_eq!(visible_ids(&state), ["C"]);
        assert_eq!(state.output.tables.sources.rows, vec![("Lancet".to_string(), 1)]);

        state.reset_filters();
        assert_eq!(visible_ids(&state), ["C", "B", "A"]);
    }

    #[test]
    fn detail_window_tracks_selection() {
        let mut state = loaded();
        state.open_article(1);
        assert_eq!(state.selected().map(|a| a.id.as_str()), Some("B"));
        state.open_article(99);
        assert_eq!(state.selected().map(|a| a.id.as_str()), Some("B"));
        state.close_article();
        assert!(state.selected().is_none());
    }

    #[test]
    fn failed_load_leaves_filters_on_empty_set() {
        let mut state = loaded();
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("missing.json");
        state.load(missing.to_str().unwrap());

        assert!(state.load_error.is_some());
        assert!(state.dataset.is_none());
        assert_eq!(state.showing_label(), "Showing 0 of 0 articles");

        state.set_search_text("anything");
        state.set_therapy_area("Onc".into());
        assert!(state.output.visible.is_empty());
        assert_eq!(state.available_terms, vec![Selection::All]);
    }
}
