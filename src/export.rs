use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::data::model::Article;

/// One CSV row; set-valued columns are joined with "; ".
#[derive(Debug, Serialize)]
struct ArticleRow<'a> {
    id: &'a str,
    date: &'a str,
    journal: &'a str,
    title: &'a str,
    therapy_areas: String,
    terms: String,
    link: &'a str,
    summary: &'a str,
}

impl<'a> From<&'a Article> for ArticleRow<'a> {
    fn from(a: &'a Article) -> Self {
        let join = |set: &std::collections::BTreeSet<String>| {
            set.iter().map(String::as_str).collect::<Vec<_>>().join("; ")
        };
        ArticleRow {
            id: &a.id,
            date: &a.date,
            journal: &a.journal,
            title: &a.title,
            therapy_areas: join(&a.therapy_areas),
            terms: join(&a.terms),
            link: &a.link,
            summary: &a.summary,
        }
    }
}

/// Write `articles` as CSV, in the given order.
pub fn write_csv<'a, W: Write>(writer: W, articles: impl IntoIterator<Item = &'a Article>) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut rows = 0;
    for article in articles {
        wtr.serialize(ArticleRow::from(article))
            .with_context(|| format!("writing article {}", article.id))?;
        rows += 1;
    }
    wtr.flush().context("flushing CSV")?;
    Ok(rows)
}

/// Export to a file, returning the number of rows written.
pub fn export_csv<'a>(path: &Path, articles: impl IntoIterator<Item = &'a Article>) -> Result<usize> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let rows = write_csv(file, articles)?;
    log::info!("Exported {rows} articles to {}", path.display());
    Ok(rows)
}
