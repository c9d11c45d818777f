use serde::{
    Deserialize,
    Serialize,
};

/// Unit the agent uses to render and store the values of a graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Unit {
    #[default]
    #[serde(rename = "float")]
    #[strum(serialize = "float")]
    Float,
    #[serde(rename = "integer")]
    #[strum(serialize = "integer")]
    Integer,
    #[serde(rename = "percentage")]
    #[strum(serialize = "percentage")]
    Percentage,
    #[serde(rename = "seconds")]
    #[strum(serialize = "seconds")]
    Seconds,
    #[serde(rename = "milliseconds")]
    #[strum(serialize = "milliseconds")]
    Milliseconds,
    #[serde(rename = "bytes")]
    #[strum(serialize = "bytes")]
    Bytes,
    #[serde(rename = "bytes/sec")]
    #[strum(serialize = "bytes/sec")]
    BytesPerSecond,
    #[serde(rename = "bits/sec")]
    #[strum(serialize = "bits/sec")]
    BitsPerSecond,
    #[serde(rename = "iops")]
    #[strum(serialize = "iops")]
    Iops,
}

/// A single line on a graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub stacked: bool,
}

impl Metric {
    pub fn new(name: impl ToString, label: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            stacked: false,
        }
    }
}

/// A group of metrics rendered together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    pub label: String,
    pub unit: Unit,
    pub metrics: Vec<Metric>,
}

impl Graph {
    /// Whether `name` is one of the metrics declared on this graph.
    pub fn declares(&self, name: &str) -> bool {
        self.metrics.iter().any(|metric| metric.name == name)
    }
}
