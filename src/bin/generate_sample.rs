use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, SecondsFormat};
use serde_json::{json, Value};

/// SplitMix64; enough to vary the sample while keeping it reproducible.
struct SampleRng(u64);

impl SampleRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len())]
    }
}

const AREAS: [&str; 5] = ["Oncology", "Cardiology", "Neurology", "Immunology", "Rare Disease"];

const JOURNALS: [&str; 6] = [
    "The Lancet",
    "NEJM",
    "JAMA",
    "Nature Medicine",
    "BMJ",
    "Journal of Clinical Oncology",
];

const TERMS: [&str; 4] = ["clinical trial", "real-world evidence", "biomarker", "gene therapy"];

const TOPICS: [&str; 6] = [
    "checkpoint inhibitor",
    "SGLT2 inhibitor",
    "anti-amyloid antibody",
    "CAR-T therapy",
    "mRNA vaccine",
    "antisense oligonucleotide",
];

fn main() {
    let mut rng = SampleRng(42);
    let start = NaiveDate::from_ymd_opt(2025, 1, 6).expect("valid start date");

    let mut articles: Vec<Value> = Vec::new();
    let mut distribution: BTreeMap<&str, u64> = BTreeMap::new();

    for id in 1..=40 {
        let topic = rng.pick(&TOPICS);
        let journal = rng.pick(&JOURNALS);
        let date = start + Duration::days(rng.below(28) as i64);

        // Every fourth article uses the older single-value classification.
        let legacy = id % 4 == 0;
        let primary = *rng.pick(&AREAS);
        let secondary = *rng.pick(&AREAS);
        let mut areas = vec![primary];
        if !legacy && secondary != primary && rng.below(3) == 0 {
            areas.push(secondary);
        }
        for area in &areas {
            *distribution.entry(*area).or_default() += 1;
        }
        let term = *rng.pick(&TERMS);

        let mut article = json!({
            "id": id,
            "title": format!("{topic} outcomes in a {term} setting"),
            "description": format!("Report on {topic} published in {journal}."),
            "summary": format!("Study {id} evaluates {topic} with a focus on {term}."),
            "journal": journal,
            "date": date.format("%Y-%m-%d").to_string(),
            "link": format!("https://example.org/articles/{id}"),
            "takeaways": [
                format!("- {topic} showed a consistent effect"),
                "- Further trials are planned",
            ],
        });

        let obj = article.as_object_mut().expect("article is an object");
        if legacy {
            obj.insert("therapyArea".into(), json!(primary));
            obj.insert("term".into(), json!(term));
        } else {
            obj.insert("therapyAreas".into(), json!(areas));
            obj.insert("terms".into(), json!([term]));
        }
        if id % 3 == 0 {
            obj.insert("authors".into(), json!("A. Researcher, B. Clinician"));
        }
        articles.push(article);
    }

    // One record with a date nobody can parse.
    articles.push(json!({
        "id": 41,
        "title": "Conference abstract without a publication date",
        "journal": "Conference Proceedings",
        "date": "TBD",
        "therapyAreas": ["Oncology"],
        "terms": ["clinical trial"],
        "takeaways": [],
    }));
    *distribution.entry("Oncology").or_default() += 1;

    // Fixed so repeated runs write identical files.
    let generated_at = (start + Duration::days(28))
        .and_hms_opt(6, 0, 0)
        .expect("valid time")
        .and_utc()
        .to_rfc3339_opts(SecondsFormat::Secs, true);

    let document = json!({
        "metadata": { "generatedAt": generated_at },
        "keyHighlights": {
            "summary": "Sample digest generated for local testing.",
            "trends": ["Combination regimens", "Earlier lines of therapy"],
            "technologies": ["CAR-T", "mRNA", "ASO"],
            "therapy_area_distribution": distribution,
            "total_articles": articles.len(),
        },
        "articles": articles,
    });

    let output_path = "sample_dashboard_data.json";
    let text = serde_json::to_string_pretty(&document).expect("serializing sample digest");
    std::fs::write(output_path, text).expect("Failed to write output file");

    println!(
        "Wrote {} articles to {output_path}",
        document["articles"].as_array().map_or(0, Vec::len)
    );
}
