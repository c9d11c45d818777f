use mackerel_plugin_host::{
    Graph,
    Metric,
    Unit,
};
use std::collections::HashMap;
use unicode_segmentation::UnicodeSegmentation as _;

/// The one graph group this plugin reports.
pub const GRAPH_KEY: &str = "global";

/// Counters reported by SendGrid, in display order.
pub const METRICS: [(&str, &str); 15] = [
    ("bounce_drops", "BounceDrops"),
    ("bounces", "Bounces"),
    ("clicks", "Clicks"),
    ("deferred", "Deferred"),
    ("delivered", "Delivered"),
    ("invalid_emails", "InvalidEmails"),
    ("opens", "Opens"),
    ("processed", "Processed"),
    ("requests", "Requests"),
    ("spam_report_drops", "SpamReportDrops"),
    ("spam_reports", "SpamReports"),
    ("unique_clicks", "UniqueClicks"),
    ("unique_opens", "UniqueOpens"),
    ("unsubscribe_drops", "UnsubscribeDrops"),
    ("unsubscribes", "Unsubscribes"),
];

pub fn definition(prefix: &str) -> HashMap<String, Graph> {
    let graph = Graph {
        label: title_case(prefix),
        unit: Unit::Integer,
        metrics: METRICS
            .iter()
            .map(|(name, label)| Metric::new(name, label))
            .collect(),
    };
    HashMap::from([(GRAPH_KEY.to_string(), graph)])
}

/// Upper-case the first letter of every word and lower-case the rest. Words
/// follow Unicode word boundaries, so `_`, `'` and `.` inside a word do not
/// split it.
pub fn title_case(text: &str) -> String {
    let mut titled = String::with_capacity(text.len());
    for segment in text.split_word_bounds() {
        let mut chars = segment.chars();
        match chars.next() {
            Some(first) if first.is_alphanumeric() => {
                titled.extend(first.to_uppercase());
                titled.extend(chars.flat_map(char::to_lowercase));
            }
            _ => titled.push_str(segment),
        }
    }
    titled
}
