//! # SendGrid stats client
//!
//! Requests the global statistics of the previous day from
//! `GET /v3/stats?start_date=<day>&end_date=<day>` and flattens the first entry of
//! the response into a `name -> value` map.
//!
//! The provider answers with one element per day, each holding a list of stat
//! entries:
//!
//! ```json
//! [{ "date": "2024-03-01", "stats": [{ "metrics": { "opens": 42, "clicks": 7 } }] }]
//! ```

use chrono::{
    DateTime,
    Local,
    NaiveDate,
};
use reqwest::{
    blocking::Client,
    header,
    StatusCode,
};
use serde::{
    Deserialize,
    Deserializer,
};
use std::collections::HashMap;
use url::Url;

pub const ENDPOINT: &str = "https://api.sendgrid.com/v3/stats";

pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("failed to parse endpoint {endpoint}: {error}")]
    Endpoint { endpoint: String, error: url::ParseError },
    #[error("failed to build the stats request: {0}")]
    Request(reqwest::Error),
    #[error("failed to request Sendgrid stats API {url}: {error}")]
    Transport { url: Url, error: reqwest::Error },
    #[error("Sendgrid returns status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to read response body: {0}")]
    Body(reqwest::Error),
    #[error("failed to decode stats response: {error}")]
    Decode { body: String, error: serde_json::Error },
}

/// One day of statistics.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DailyStats {
    #[serde(default, deserialize_with = "null_as_default")]
    pub stats: Vec<Stat>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Stat {
    #[serde(default, deserialize_with = "null_as_default")]
    pub metrics: HashMap<String, Option<i64>>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Take the first stat entry of the first day. No days or no entries is an empty
/// result, not an error.
pub fn flatten(days: &[DailyStats]) -> HashMap<String, f64> {
    let Some(stat) = days.first().and_then(|day| day.stats.first()) else {
        info!("no stats found");
        return HashMap::new();
    };

    stat.metrics
        .iter()
        .map(|(name, value)| (name.clone(), value.unwrap_or_default() as f64))
        .collect()
}

/// The day reported for a collection at `now`: 24 hours earlier.
pub fn stats_window(now: DateTime<Local>) -> NaiveDate {
    (now - chrono::Duration::hours(24)).date_naive()
}

#[derive(Clone)]
pub struct StatsFetcher {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl std::fmt::Debug for StatsFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsFetcher")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl StatsFetcher {
    pub fn new(api_key: impl ToString) -> Self {
        Self {
            client: Client::new(),
            endpoint: ENDPOINT.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Point the fetcher at another stats endpoint.
    pub fn with_endpoint(mut self, endpoint: impl ToString) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    /// Fetch yesterday's statistics.
    pub fn fetch(&self) -> Result<HashMap<String, f64>, FetchError> {
        self.fetch_at(Local::now())
    }

    /// Fetch the statistics of the day before `now`. A single attempt is made.
    pub fn fetch_at(&self, now: DateTime<Local>) -> Result<HashMap<String, f64>, FetchError> {
        let url = self.stats_url(stats_window(now))?;

        let request = self
            .client
            .get(url.clone())
            .header(header::USER_AGENT, USER_AGENT)
            .bearer_auth(&self.api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .build()
            .map_err(|error| {
                error!(%error, "failed to build http request");
                FetchError::Request(error)
            })?;

        debug!(%url, "requesting Sendgrid stats");
        let response = self.client.execute(request).map_err(|error| {
            error!(%url, %error, "failed to request Sendgrid stats API");
            FetchError::Transport { url, error }
        })?;

        let status = response.status();
        let body = response.text().map_err(|error| {
            error!(%error, "failed to read response body");
            FetchError::Body(error)
        })?;

        if status != StatusCode::OK {
            error!(%status, "unexpected http status");
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let days: Vec<DailyStats> = serde_json::from_str(&body).map_err(|error| {
            error!(%error, %body, "failed to decode response body");
            FetchError::Decode { body: body.clone(), error }
        })?;
        debug!(days = days.len(), "decoded Sendgrid stats");

        Ok(flatten(&days))
    }

    fn stats_url(&self, day: NaiveDate) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.endpoint).map_err(|error| {
            error!(endpoint = %self.endpoint, %error, "failed to parse endpoint");
            FetchError::Endpoint {
                endpoint: self.endpoint.clone(),
                error,
            }
        })?;

        let day = day.format(DATE_FORMAT).to_string();
        url.query_pairs_mut()
            .clear()
            .append_pair("start_date", &day)
            .append_pair("end_date", &day);
        Ok(url)
    }
}
