use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::aggregate::{aggregate, ChartTables};
use super::model::{Article, Digest};

/// Label of the "no restriction" entry in every dropdown.
pub const ALL_LABEL: &str = "All";

// ---------------------------------------------------------------------------
// Selection – one dropdown value
// ---------------------------------------------------------------------------

/// Either no restriction on a dimension, or exactly one label.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    /// Whether an article carrying `labels` passes this selection.
    pub fn admits(&self, labels: &BTreeSet<String>) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(label) => labels.contains(label),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Selection::All => ALL_LABEL,
            Selection::Only(label) => label,
        }
    }
}

impl From<&str> for Selection {
    fn from(s: &str) -> Self {
        if s == ALL_LABEL {
            Selection::All
        } else {
            Selection::Only(s.to_string())
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// SortOrder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

impl SortOrder {
    pub const ALL: [SortOrder; 2] = [SortOrder::Newest, SortOrder::Oldest];

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Newest => "Newest first",
            SortOrder::Oldest => "Oldest first",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            other => Err(format!("unknown sort order '{other}' (expected newest or oldest)")),
        }
    }
}

// ---------------------------------------------------------------------------
// FilterCriteria
// ---------------------------------------------------------------------------

/// Everything the user can change about which articles are shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search_text: String,
    pub therapy_area: Selection,
    pub term: Selection,
    pub sort_order: SortOrder,
}

impl FilterCriteria {
    fn admits(&self, article: &Article, needle: &str) -> bool {
        self.therapy_area.admits(&article.therapy_areas)
            && self.term.admits(&article.terms)
            && article.matches_search(needle)
    }
}

/// Return indices of articles passing `criteria`, sorted by date.
///
/// The sort is stable, so articles with equal dates keep document order.
/// Articles without a parseable date count as the oldest.
pub fn filtered_indices(articles: &[Article], criteria: &FilterCriteria) -> Vec<usize> {
    let needle = criteria.search_text.to_lowercase();

    let mut indices: Vec<usize> = articles
        .iter()
        .enumerate()
        .filter(|(_, article)| criteria.admits(article, &needle))
        .map(|(i, _)| i)
        .collect();

    indices.sort_by(|&a, &b| {
        let ord = articles[a].published.cmp(&articles[b].published);
        match criteria.sort_order {
            SortOrder::Newest => ord.reverse(),
            SortOrder::Oldest => ord,
        }
    });
    indices
}

// ---------------------------------------------------------------------------
// apply – the full derivation
// ---------------------------------------------------------------------------

/// Visible articles plus the chart tables derived from them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOutput {
    pub visible: Vec<usize>,
    pub tables: ChartTables,
}

pub fn apply(digest: &Digest, criteria: &FilterCriteria) -> FilterOutput {
    let visible = filtered_indices(&digest.articles, criteria);
    let tables = aggregate(digest, &visible);
    FilterOutput { visible, tables }
}

/// Terms selectable under `therapy_area`, `All` first.
pub fn available_terms(digest: &Digest, therapy_area: &Selection) -> Vec<Selection> {
    let terms: BTreeSet<&str> = match therapy_area {
        Selection::All => digest.terms.iter().map(String::as_str).collect(),
        area => digest
            .articles
            .iter()
            .filter(|a| area.admits(&a.therapy_areas))
            .flat_map(|a| a.terms.iter().map(String::as_str))
            .collect(),
    };

    std::iter::once(Selection::All)
        .chain(terms.into_iter().map(|t| Selection::Only(t.to_string())))
        .collect()
}

/// Therapy-area dropdown entries, `All` first.
pub fn available_therapy_areas(digest: &Digest) -> Vec<Selection> {
    std::iter::once(Selection::All)
        .chain(digest.therapy_areas.iter().map(|a| Selection::Only(a.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_fixtures::{digest, ids, three_articles};
    use serde_json::json;

    fn criteria(area: &str, term: &str) -> FilterCriteria {
        FilterCriteria {
            therapy_area: area.into(),
            term: term.into(),
            ..Default::default()
        }
    }

    #[test]
    fn no_restriction_returns_everything_sorted() {
        let d = three_articles();
        let newest = filtered_indices(&d.articles, &FilterCriteria::default());
        assert_eq!(ids(&d, &newest), ["C", "B", "A"]);

        let oldest = filtered_indices(
            &d.articles,
            &FilterCriteria {
                sort_order: SortOrder::Oldest,
                ..Default::default()
            },
        );
        assert_eq!(ids(&d, &oldest), ["A", "B", "C"]);
    }

    #[test]
    fn therapy_area_uses_set_membership() {
        let d = three_articles();
        let out = apply(&d, &criteria("Onc", "All"));
        assert_eq!(ids(&d, &out.visible), ["B", "A"]);

        let out = apply(&d, &criteria("Onc", "Y"));
        assert_eq!(ids(&d, &out.visible), ["B"]);

        let out = apply(&d, &criteria("CV", "X"));
        assert_eq!(ids(&d, &out.visible), ["C"]);
    }

    #[test]
    fn search_ignores_case_and_journal() {
        let d = three_articles();
        let c = FilterCriteria {
            search_text: "IMMUN".to_string(),
            ..Default::default()
        };
        // B only mentions "Immunity" in its journal.
        assert_eq!(ids(&d, &filtered_indices(&d.articles, &c)), ["A"]);
    }

    #[test]
    fn apply_is_idempotent() {
        let d = three_articles();
        let c = FilterCriteria {
            search_text: "a".to_string(),
            therapy_area: "CV".into(),
            ..Default::default()
        };
        assert_eq!(apply(&d, &c), apply(&d, &c));
    }

    #[test]
    fn equal_dates_keep_document_order_and_undated_are_oldest() {
        let d = digest(json!({
            "articles": [
                { "id": "1", "date": "2024-05-01" },
                { "id": "2", "date": "not a date" },
                { "id": "3", "date": "2024-05-01" },
                { "id": "4", "date": "2023-12-31" }
            ]
        }));
        let newest = filtered_indices(&d.articles, &FilterCriteria::default());
        assert_eq!(ids(&d, &newest), ["1", "3", "4", "2"]);

        let oldest = filtered_indices(
            &d.articles,
            &FilterCriteria {
                sort_order: SortOrder::Oldest,
                ..Default::default()
            },
        );
        assert_eq!(ids(&d, &oldest), ["2", "4", "1", "3"]);
    }

    #[test]
    fn available_terms_follow_area() {
        let d = three_articles();
        let all = available_terms(&d, &Selection::All);
        assert_eq!(all, vec![Selection::All, "X".into(), "Y".into()]);

        let cv = available_terms(&d, &"CV".into());
        assert_eq!(cv, vec![Selection::All, "X".into(), "Y".into()]);

        let missing = available_terms(&d, &"Neuro".into());
        assert_eq!(missing, vec![Selection::All]);

        for area in &d.therapy_areas {
            let subset = available_terms(&d, &Selection::Only(area.clone()));
            assert!(subset.iter().all(|t| all.contains(t)));
        }
    }

    #[test]
    fn all_label_round_trips_to_sentinel() {
        assert_eq!(Selection::from("All"), Selection::All);
        assert_eq!(Selection::from("Onc").to_string(), "Onc");
        assert_eq!("oldest".parse::<SortOrder>(), Ok(SortOrder::Oldest));
        assert!("sideways".parse::<SortOrder>().is_err());
    }
}
