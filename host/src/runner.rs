use crate::{
    Graph,
    Plugin,
};
use chrono::{
    DateTime,
    Utc,
};
use eyre::{
    Context as _,
    Result,
};
use serde::Serialize;
use std::{
    collections::{
        BTreeMap,
        HashMap,
    },
    io::Write,
};

/// Set by the agent when it wants the graph definition instead of values.
pub const META_ENV: &str = "MACKEREL_AGENT_PLUGIN_META";

/// First line of the graph definition output.
pub const META_HEADER: &str = "# mackerel-agent-plugin";

pub fn meta_requested() -> bool {
    std::env::var_os(META_ENV).is_some_and(|value| !value.is_empty())
}

#[derive(Serialize)]
struct GraphDefinitions<'a> {
    graphs: BTreeMap<String, &'a Graph>,
}

/// Drives a [`Plugin`] the way the agent expects: either print its graph
/// definition or fetch once and print the values.
pub struct Runner<P> {
    plugin: P,
}

impl<P: Plugin> Runner<P> {
    pub fn new(plugin: P) -> Self {
        Self { plugin }
    }

    pub fn run(&self) -> Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        if meta_requested() {
            self.output_definitions(&mut out)
        } else {
            self.output_values(&mut out, Utc::now())
        }
    }

    /// Print the meta header and the graph definition as a single JSON line.
    pub fn output_definitions(&self, out: &mut impl Write) -> Result<()> {
        let definition = self.plugin.graph_definition();
        let prefix = self.plugin.metric_key_prefix();

        let graphs = definition
            .iter()
            .map(|(key, graph)| (join_key(&[prefix, key.as_str()]), graph))
            .collect::<BTreeMap<_, _>>();
        for (key, graph) in &graphs {
            debug!(%key, unit = %graph.unit, metrics = graph.metrics.len(), "writing graph definition");
        }

        writeln!(out, "{META_HEADER}").context("failed to write meta header")?;
        serde_json::to_writer(&mut *out, &GraphDefinitions { graphs }).context("failed to encode graph definition")?;
        writeln!(out).context("failed to write graph definition")?;
        Ok(())
    }

    /// Fetch once and print every value as `key\tvalue\ttimestamp`.
    ///
    /// Declared metrics come first, in graph and declaration order. Values the
    /// plugin returned without declaring them follow, sorted, under the first
    /// graph.
    pub fn output_values(&self, out: &mut impl Write, now: DateTime<Utc>) -> Result<()> {
        let values = self.plugin.fetch_metrics().map_err(|err| {
            error!(%err, "failed to fetch metrics");
            eyre::Report::new(err)
        })?;

        let definition = self.plugin.graph_definition();
        let prefix = self.plugin.metric_key_prefix();
        let timestamp = now.timestamp();

        let graphs = definition.iter().collect::<BTreeMap<_, _>>();
        for (key, graph) in &graphs {
            for metric in &graph.metrics {
                let Some(value) = values.get(&metric.name) else {
                    continue;
                };
                write_value(out, &join_key(&[prefix, key.as_str(), metric.name.as_str()]), *value, timestamp)?;
            }
        }

        let undeclared = undeclared(&values, &definition);
        if !undeclared.is_empty() {
            debug!(?undeclared, "emitting metrics missing from the graph definition");
            let first = graphs.keys().next().map(|key| key.as_str()).unwrap_or_default();
            for (name, value) in undeclared {
                write_value(out, &join_key(&[prefix, first, name]), value, timestamp)?;
            }
        }

        Ok(())
    }
}

fn undeclared<'a>(values: &'a HashMap<String, f64>, definition: &HashMap<String, Graph>) -> BTreeMap<&'a str, f64> {
    values
        .iter()
        .filter(|(name, _)| !definition.values().any(|graph| graph.declares(name)))
        .map(|(name, value)| (name.as_str(), *value))
        .collect()
}

fn join_key(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(".")
}

fn write_value(out: &mut impl Write, key: &str, value: f64, timestamp: i64) -> Result<()> {
    writeln!(out, "{key}\t{value:.6}\t{timestamp}").with_context(|| format!("failed to write value for {key}"))
}
