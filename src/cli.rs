use std::path::PathBuf;

use clap::Parser;

use crate::data::filter::{FilterCriteria, Selection, SortOrder};

/// Literature digest dashboard.
///
/// Without `--export` the dashboard window opens on the given digest.
#[derive(Debug, Parser)]
#[command(name = "digest-dashboard", version, about)]
pub struct Args {
    /// Digest JSON document: file path or http(s) URL
    #[arg(short, long, default_value = "data/latest_dashboard_data.json")]
    pub data: String,

    /// Write the filtered articles to this CSV file instead of opening the window
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Case-insensitive search over title, description, summary and takeaways
    #[arg(long, default_value = "")]
    pub search: String,

    /// Therapy area to keep ("All" for no restriction)
    #[arg(long, default_value = "All")]
    pub area: String,

    /// Term to keep ("All" for no restriction)
    #[arg(long, default_value = "All")]
    pub term: String,

    /// newest or oldest
    #[arg(long, default_value = "newest")]
    pub sort: SortOrder,
}

impl Args {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            search_text: self.search.clone(),
            therapy_area: Selection::from(self.area.as_str()),
            term: Selection::from(self.term.as_str()),
            sort_order: self.sort,
        }
    }
}
