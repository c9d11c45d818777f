use crate::{
    graph,
    stats::{
        FetchError,
        StatsFetcher,
    },
};
use mackerel_plugin_host::{
    Graph,
    Plugin,
};
use std::collections::HashMap;

/// Reports yesterday's SendGrid statistics under `prefix`.
#[derive(Debug, Clone)]
pub struct SendgridPlugin {
    prefix: String,
    fetcher: StatsFetcher,
}

impl SendgridPlugin {
    pub fn new(prefix: impl ToString, api_key: impl ToString) -> Self {
        Self {
            prefix: prefix.to_string(),
            fetcher: StatsFetcher::new(api_key),
        }
    }

    pub fn with_fetcher(mut self, fetcher: StatsFetcher) -> Self {
        self.fetcher = fetcher;
        self
    }
}

impl Plugin for SendgridPlugin {
    type Error = FetchError;

    fn fetch_metrics(&self) -> Result<HashMap<String, f64>, FetchError> {
        self.fetcher.fetch()
    }

    fn graph_definition(&self) -> HashMap<String, Graph> {
        graph::definition(&self.prefix)
    }

    fn metric_key_prefix(&self) -> &str {
        &self.prefix
    }
}
