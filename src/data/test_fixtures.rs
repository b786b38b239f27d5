use serde_json::json;

use super::model::{Digest, DigestDocument};

/// Three articles: A{Onc; X; 2024-01-01}, B{Onc, CV; Y; 2024-02-01},
/// C{CV; X; 2024-03-01}. A and C share a journal.
pub fn three_articles() -> Digest {
    digest(json!({
        "metadata": { "generatedAt": "2024-03-02T09:00:00Z" },
        "articles": [
            {
                "id": "A",
                "title": "Checkpoint inhibitor outcomes",
                "description": "Long-term follow-up",
                "summary": "Survival benefit in NSCLC",
                "journal": "Lancet",
                "date": "2024-01-01",
                "therapyAreas": ["Onc"],
                "terms": ["X"],
                "takeaways": ["- Durable immune response"]
            },
            {
                "id": "B",
                "title": "Cardiotoxicity of anthracyclines",
                "description": "Registry analysis",
                "summary": "Dose-dependent risk",
                "journal": "Immunity",
                "date": "2024-02-01",
                "therapyAreas": ["Onc", "CV"],
                "terms": ["Y"],
                "takeaways": ["- Monitor LVEF"]
            },
            {
                "id": "C",
                "title": "Statin adherence",
                "description": "Cohort study",
                "summary": "Adherence drops after one year",
                "journal": "Lancet",
                "date": "2024-03-01",
                "therapyArea": "CV",
                "term": "X",
                "takeaways": []
            }
        ]
    }))
}

pub fn digest(value: serde_json::Value) -> Digest {
    let doc: DigestDocument = serde_json::from_value(value).unwrap();
    Digest::from_document(doc)
}

pub fn ids(digest: &Digest, visible: &[usize]) -> Vec<String> {
    visible
        .iter()
        .map(|&i| digest.articles[i].id.clone())
        .collect()
}
