use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

// ---------------------------------------------------------------------------
// Date parsing
// ---------------------------------------------------------------------------

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Parse the loosely formatted `date` field of an article into a calendar date.
///
/// Returns `None` when nothing matches; callers order such articles before
/// every dated one.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt.date());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// `null` and missing both become the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Scalar JSON values as text; arrays of scalars joined with ", ".
/// Objects and `null` become the empty string.
fn json_text(value: JsonValue) -> String {
    match value {
        JsonValue::String(s) => s,
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Array(items) => items
            .into_iter()
            .map(json_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        JsonValue::Null | JsonValue::Object(_) => String::new(),
    }
}

/// A single text value of any JSON type; never fails.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(json_text(JsonValue::deserialize(deserializer)?))
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = lenient_string(deserializer)?;
    Ok(Some(text).filter(|s| !s.trim().is_empty()))
}

/// A list of text values; a lone scalar becomes a one-element list.
fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match JsonValue::deserialize(deserializer)? {
        JsonValue::Array(items) => items.into_iter().map(json_text).collect(),
        JsonValue::Null | JsonValue::Object(_) => Vec::new(),
        scalar => vec![json_text(scalar)],
    };
    Ok(items.into_iter().filter(|s| !s.is_empty()).collect())
}

// ---------------------------------------------------------------------------
// RawArticle – one record exactly as the digest generator writes it
// ---------------------------------------------------------------------------

/// Older digests carry `therapyArea`/`term`, newer ones the plural arrays.
/// Both are accepted and merged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawArticle {
    id: JsonValue,
    #[serde(deserialize_with = "lenient_string")]
    title: String,
    #[serde(deserialize_with = "lenient_string")]
    description: String,
    #[serde(deserialize_with = "lenient_string")]
    summary: String,
    #[serde(deserialize_with = "lenient_string")]
    journal: String,
    #[serde(deserialize_with = "lenient_string")]
    date: String,
    #[serde(deserialize_with = "lenient_string")]
    link: String,
    #[serde(deserialize_with = "lenient_opt_string")]
    authors: Option<String>,
    #[serde(deserialize_with = "lenient_strings")]
    takeaways: Vec<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    therapy_area: Option<String>,
    #[serde(deserialize_with = "lenient_strings")]
    therapy_areas: Vec<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    term: Option<String>,
    #[serde(deserialize_with = "lenient_strings")]
    terms: Vec<String>,
}

fn merge_labels(plural: Vec<String>, single: Option<String>) -> BTreeSet<String> {
    plural
        .into_iter()
        .chain(single)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// Article – normalized, immutable after load
// ---------------------------------------------------------------------------

/// A single digest article with its classification lifted into sets.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawArticle")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub description: String,
    pub summary: String,
    /// Source name; also the label of the sources chart.
    pub journal: String,
    /// Date exactly as written in the document.
    pub date: String,
    /// `date` parsed once at load time.
    pub published: Option<NaiveDate>,
    pub link: String,
    pub authors: Option<String>,
    pub takeaways: Vec<String>,
    pub therapy_areas: BTreeSet<String>,
    pub terms: BTreeSet<String>,
    /// Lowercased title, description, summary and takeaways.
    search_blob: String,
}

impl From<RawArticle> for Article {
    fn from(raw: RawArticle) -> Self {
        let id = match raw.id {
            JsonValue::Null => String::new(),
            JsonValue::String(s) => s,
            other => other.to_string(),
        };
        let search_blob = format!(
            "{} {} {} {}",
            raw.title,
            raw.description,
            raw.summary,
            raw.takeaways.join(" ")
        )
        .to_lowercase();

        Article {
            id,
            published: parse_date(&raw.date),
            therapy_areas: merge_labels(raw.therapy_areas, raw.therapy_area),
            terms: merge_labels(raw.terms, raw.term),
            authors: raw.authors,
            title: raw.title,
            description: raw.description,
            summary: raw.summary,
            journal: raw.journal,
            date: raw.date,
            link: raw.link,
            takeaways: raw.takeaways,
            search_blob,
        }
    }
}

impl Article {
    /// Case-insensitive substring probe over the searchable text fields.
    /// `needle` must already be lowercase.
    pub fn matches_search(&self, needle: &str) -> bool {
        needle.is_empty() || self.search_blob.contains(needle)
    }

    /// Takeaways as display lines, with one leading dash stripped.
    pub fn takeaway_lines(&self) -> impl Iterator<Item = &str> {
        self.takeaways.iter().map(|t| match t.strip_prefix('-') {
            Some(rest) => rest.trim(),
            None => t.as_str(),
        })
    }
}

// ---------------------------------------------------------------------------
// Digest document
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DigestMetadata {
    #[serde(rename = "generatedAt", default)]
    pub generated_at: Option<String>,
}

/// Editorial summary block some digests carry next to the article list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct KeyHighlights {
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub trends: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub technologies: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub therapy_area_distribution: BTreeMap<String, u64>,
    #[serde(deserialize_with = "null_as_default")]
    pub total_articles: u64,
}

/// The fetched JSON document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestDocument {
    #[serde(default)]
    pub metadata: DigestMetadata,
    pub articles: Vec<Article>,
    #[serde(default)]
    pub key_highlights: Option<KeyHighlights>,
}

// ---------------------------------------------------------------------------
// Digest – the loaded document with pre-computed option sets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Digest {
    /// All articles in document order.
    pub articles: Vec<Article>,
    pub generated_at: Option<String>,
    pub key_highlights: Option<KeyHighlights>,
    /// Every therapy area seen on any article.
    pub therapy_areas: BTreeSet<String>,
    /// Every term seen on any article.
    pub terms: BTreeSet<String>,
}

impl Digest {
    pub fn from_document(doc: DigestDocument) -> Self {
        let mut therapy_areas = BTreeSet::new();
        let mut terms = BTreeSet::new();
        for article in &doc.articles {
            therapy_areas.extend(article.therapy_areas.iter().cloned());
            terms.extend(article.terms.iter().cloned());
        }

        Digest {
            articles: doc.articles,
            generated_at: doc.metadata.generated_at,
            key_highlights: doc.key_highlights,
            therapy_areas,
            terms,
        }
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Areas the highlights block knows about, so the area chart can show
    /// zero counts. `None` when the digest has no highlights.
    pub fn known_areas(&self) -> Option<Vec<String>> {
        self.key_highlights
            .as_ref()
            .map(|h| h.therapy_area_distribution.keys().cloned().collect())
    }

    /// Number of articles whose date could not be parsed.
    pub fn undated_count(&self) -> usize {
        self.articles.iter().filter(|a| a.published.is_none()).count()
    }

    /// "Last Updated: March 5, 2025", or the raw value if it is not a timestamp.
    pub fn last_updated_label(&self) -> Option<String> {
        let raw = self.generated_at.as_deref()?;
        let shown = match parse_date(raw) {
            Some(date) => date.format("%B %-d, %Y").to_string(),
            None => raw.to_string(),
        };
        Some(format!("Last Updated: {shown}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn article(value: JsonValue) -> Article {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn legacy_single_classification_becomes_singleton_sets() {
        let a = article(json!({
            "id": 7,
            "title": "T",
            "therapyArea": "Oncology",
            "term": "ASCO feed",
            "date": "2024-01-01"
        }));
        assert_eq!(a.id, "7");
        assert_eq!(a.therapy_areas, BTreeSet::from(["Oncology".to_string()]));
        assert_eq!(a.terms, BTreeSet::from(["ASCO feed".to_string()]));
    }

    #[test]
    fn plural_classification_is_deduplicated() {
        let a = article(json!({
            "id": "x1",
            "therapyAreas": ["Cardiology", "Oncology", "Cardiology", " "],
            "terms": ["b", "a"]
        }));
        let areas: Vec<_> = a.therapy_areas.iter().map(String::as_str).collect();
        assert_eq!(areas, ["Cardiology", "Oncology"]);
        assert_eq!(a.terms.len(), 2);
    }

    #[test]
    fn missing_and_null_fields_default() {
        let a = article(json!({ "title": null, "takeaways": null }));
        assert_eq!(a.id, "");
        assert_eq!(a.title, "");
        assert!(a.takeaways.is_empty());
        assert!(a.therapy_areas.is_empty());
        assert!(a.published.is_none());
        assert!(a.authors.is_none());
    }

    #[test]
    fn takeaway_lines_strip_one_leading_dash() {
        let a = article(json!({
            "takeaways": ["- first", "second", "--third", "a-b"]
        }));
        let lines: Vec<_> = a.takeaway_lines().collect();
        assert_eq!(lines, ["first", "second", "-third", "a-b"]);
    }

    #[test]
    fn search_covers_text_fields_but_not_journal() {
        let a = article(json!({
            "title": "Checkpoint results",
            "description": "",
            "summary": "A phase III trial",
            "journal": "Immunology Today",
            "takeaways": ["- Durable IMMUNE response"]
        }));
        assert!(a.matches_search("immune"));
        assert!(a.matches_search("phase iii"));
        assert!(!a.matches_search("immunology"));
        assert!(a.matches_search(""));
    }

    #[test]
    fn parses_common_date_shapes() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        for raw in [
            "2024-03-15",
            "2024/03/15",
            "2024-03-15T08:30:00Z",
            "2024-03-15T08:30:00",
            "Fri, 15 Mar 2024 08:30:00 +0000",
            "March 15, 2024",
            "15 Mar 2024",
        ] {
            assert_eq!(parse_date(raw), Some(expected), "{raw}");
        }
        assert_eq!(parse_date("soon"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn digest_collects_option_sets_and_known_areas() {
        let doc: DigestDocument = serde_json::from_value(json!({
            "metadata": { "generatedAt": "2025-03-05T10:00:00Z" },
            "articles": [
                { "therapyAreas": ["Onc"], "terms": ["X"], "date": "2024-01-01" },
                { "therapyArea": "CV", "term": "Y", "date": "n/a" }
            ],
            "keyHighlights": {
                "summary": "s",
                "therapy_area_distribution": { "Neuro": 0, "Onc": 1 },
                "total_articles": 2
            }
        }))
        .unwrap();
        let digest = Digest::from_document(doc);

        assert_eq!(digest.len(), 2);
        assert_eq!(digest.therapy_areas.len(), 2);
        assert_eq!(digest.terms.len(), 2);
        assert_eq!(digest.undated_count(), 1);
        assert_eq!(
            digest.known_areas(),
            Some(vec!["Neuro".to_string(), "Onc".to_string()])
        );
        assert_eq!(
            digest.last_updated_label().as_deref(),
            Some("Last Updated: March 5, 2025")
        );
    }

    #[test]
    fn wrongly_typed_fields_are_coerced_not_rejected() {
        let a = article(json!({
            "id": 1,
            "title": 42,
            "date": 20240101,
            "authors": ["A. One", "B. Two"],
            "therapyAreas": "Onc",
            "terms": ["X", 7, { "nested": true }],
            "takeaways": "- single takeaway",
            "journal": { "name": "Lancet" },
            "term": true
        }));
        assert_eq!(a.title, "42");
        assert_eq!(a.date, "20240101");
        assert!(a.published.is_none());
        assert_eq!(a.authors.as_deref(), Some("A. One, B. Two"));
        assert_eq!(a.therapy_areas, BTreeSet::from(["Onc".to_string()]));
        let terms: Vec<_> = a.terms.iter().map(String::as_str).collect();
        assert_eq!(terms, ["7", "X", "true"]);
        assert_eq!(a.takeaway_lines().collect::<Vec<_>>(), ["single takeaway"]);
        assert_eq!(a.journal, "");
    }

    #[test]
    fn one_malformed_article_does_not_sink_the_digest() {
        let doc: DigestDocument = serde_json::from_value(json!({
            "articles": [
                { "id": "ok", "title": "Fine", "therapyAreas": ["Onc"], "date": "2024-01-01" },
                { "id": "odd", "authors": ["A. One", "B. Two"], "date": 20240101 }
            ]
        }))
        .unwrap();
        let digest = Digest::from_document(doc);
        assert_eq!(digest.len(), 2);
        assert_eq!(digest.articles[1].authors.as_deref(), Some("A. One, B. Two"));
    }

    #[test]
    fn document_without_articles_is_rejected() {
        let res: Result<DigestDocument, _> = serde_json::from_value(json!({ "metadata": {} }));
        assert!(res.is_err());
    }
}
