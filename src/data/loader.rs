use std::path::{Path, PathBuf};

use thiserror::Error;

use super::model::{Digest, DigestDocument};

// ---------------------------------------------------------------------------
// Load failure
// ---------------------------------------------------------------------------

/// Any reason the digest document could not be obtained or understood.
/// The UI treats every variant the same way.
#[derive(Debug, Error)]
pub enum LoadFailure {
    #[error("reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("fetching digest: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("parsing digest JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a digest from a local path or an `http(s)://` URL.
pub fn load_source(source: &str) -> Result<Digest, LoadFailure> {
    if is_url(source) {
        load_url(source)
    } else {
        load_file(Path::new(source))
    }
}

pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Load a digest JSON document from disk.
pub fn load_file(path: &Path) -> Result<Digest, LoadFailure> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadFailure::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_digest(&text)
}

/// Single GET, no retry; a non-success status counts as a failure.
pub fn load_url(url: &str) -> Result<Digest, LoadFailure> {
    let text = reqwest::blocking::get(url)?.error_for_status()?.text()?;
    parse_digest(&text)
}

/// Parse the document text and build the in-memory digest.
///
/// Expected shape:
///
/// ```json
/// {
///   "metadata": { "generatedAt": "2025-03-05T10:00:00Z" },
///   "articles": [
///     { "id": 1, "title": "...", "journal": "...", "date": "2025-03-01",
///       "therapyAreas": ["Oncology"], "terms": ["..."], "takeaways": ["- ..."] }
///   ],
///   "keyHighlights": { "summary": "...", "therapy_area_distribution": { "Oncology": 4 } }
/// }
/// ```
pub fn parse_digest(text: &str) -> Result<Digest, LoadFailure> {
    let doc: DigestDocument = serde_json::from_str(text)?;
    let digest = Digest::from_document(doc);

    let undated = digest.undated_count();
    if undated > 0 {
        log::warn!("{undated} article(s) have an unparseable date and sort as oldest");
    }
    Ok(digest)
}
