//! Built-in conference knowledge base.

use crate::model::Record;

/// The five conference records, in index insertion order.
pub fn conference_corpus() -> Vec<Record> {
    vec![
        Record::tagged(
            "doc_0",
            "The Vant4ge Tech Conference runs from June 15-17, 2025 at the Austin Convention Center.",
            "schedule",
            "dates",
        ),
        Record::tagged(
            "doc_1",
            "AIDA is an AI-powered assistant that helps with data analysis, customer service, and workflow automation.",
            "product",
            "aida_features",
        ),
        Record::tagged(
            "doc_2",
            "The main keynote is on June 16 at 9:00 AM featuring the future of AI in business.",
            "schedule",
            "keynote",
        ),
        Record::tagged(
            "doc_3",
            "Lunch is served daily from 12:00-1:30 PM in the main exhibition hall.",
            "logistics",
            "food",
        ),
        Record::tagged(
            "doc_4",
            "AIDA can integrate with over 100+ popular business tools including Salesforce, HubSpot, and Slack.",
            "product",
            "integrations",
        ),
    ]
}
