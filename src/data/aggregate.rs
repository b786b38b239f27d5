use std::collections::HashMap;

use super::model::{parse_date, Article, Digest};

/// The sources chart shows at most this many journals.
pub const TOP_SOURCES: usize = 10;

// ---------------------------------------------------------------------------
// AggregateTable – (label, count) rows feeding one chart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateTable {
    pub rows: Vec<(String, usize)>,
}

impl AggregateTable {
    pub fn labels(&self) -> Vec<&str> {
        self.rows.iter().map(|(label, _)| label.as_str()).collect()
    }

    pub fn counts(&self) -> Vec<usize> {
        self.rows.iter().map(|(_, count)| *count).collect()
    }

    pub fn total(&self) -> usize {
        self.rows.iter().map(|(_, count)| count).sum()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The three tables the charts render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartTables {
    pub sources: AggregateTable,
    pub areas: AggregateTable,
    pub dates: AggregateTable,
}

pub fn aggregate(digest: &Digest, visible: &[usize]) -> ChartTables {
    let known = digest.known_areas();
    ChartTables {
        sources: source_table(&digest.articles, visible),
        areas: area_table(&digest.articles, visible, known.as_deref()),
        dates: date_table(&digest.articles, visible),
    }
}

/// Count labels, keeping rows in first-seen order.
fn count_in_order<'a>(labels: impl IntoIterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut rows: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    for label in labels {
        match index.get(label) {
            Some(&i) => rows[i].1 += 1,
            None => {
                index.insert(label, rows.len());
                rows.push((label.to_string(), 1));
            }
        }
    }
    rows
}

// ---------------------------------------------------------------------------
// Individual tables
// ---------------------------------------------------------------------------

/// Articles per journal, most frequent first, top [`TOP_SOURCES`] only.
/// Equal counts keep first-seen order.
pub fn source_table(articles: &[Article], visible: &[usize]) -> AggregateTable {
    let mut rows = count_in_order(visible.iter().map(|&i| articles[i].journal.as_str()));
    rows.sort_by(|a, b| b.1.cmp(&a.1));
    rows.truncate(TOP_SOURCES);
    AggregateTable { rows }
}

/// Articles per therapy area. A multi-area article counts once per area.
///
/// With `known` areas every one of them gets a row (possibly zero), in the
/// given order, followed by any other area seen on a visible article.
pub fn area_table(articles: &[Article], visible: &[usize], known: Option<&[String]>) -> AggregateTable {
    let seen = count_in_order(
        visible
            .iter()
            .flat_map(|&i| articles[i].therapy_areas.iter().map(String::as_str)),
    );

    let Some(known) = known else {
        return AggregateTable { rows: seen };
    };

    let mut rows: Vec<(String, usize)> = known.iter().map(|area| (area.clone(), 0)).collect();
    for (label, count) in seen {
        match rows.iter_mut().find(|(area, _)| *area == label) {
            Some(row) => row.1 = count,
            None => rows.push((label, count)),
        }
    }
    AggregateTable { rows }
}

/// Articles per raw `date` string, oldest first. No calendar bucketing.
pub fn date_table(articles: &[Article], visible: &[usize]) -> AggregateTable {
    let mut rows = count_in_order(visible.iter().map(|&i| articles[i].date.as_str()));
    rows.sort_by_cached_key(|(label, _)| parse_date(label));
    AggregateTable { rows }
}
