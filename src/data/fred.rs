//! FRED integration for state-level economic series.
//!
//! Two transports are supported:
//!
//! - with an API key: the JSON `series/observations` endpoint
//! - without one: the public `fredgraph.csv` download, which FRED serves to
//!   unauthenticated clients (subject to stricter rate limits)

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::data::SeriesSource;
use crate::domain::{CredentialPolicy, Observation};
use crate::error::AppError;

const API_URL: &str = "https://api.stlouisfed.org/fred/series/observations";
const GRAPH_CSV_URL: &str = "https://fred.stlouisfed.org/graph/fredgraph.csv";

/// Environment variable holding the FRED API key.
pub const API_KEY_VAR: &str = "FRED_API_KEY";

pub struct FredClient {
    client: Client,
    api_key: Option<String>,
}

impl FredClient {
    /// Build a client from `FRED_API_KEY` (a `.env` file is honoured).
    pub fn from_env(policy: CredentialPolicy) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::new(usable_api_key(std::env::var(API_KEY_VAR).ok()), policy)
    }

    /// Build a client with an explicit (optional) API key.
    ///
    /// A missing key is fatal only under [`CredentialPolicy::Required`].
    pub fn new(api_key: Option<String>, policy: CredentialPolicy) -> Result<Self, AppError> {
        if api_key.is_none() {
            match policy {
                CredentialPolicy::Required => return Err(AppError::CredentialMissing),
                CredentialPolicy::BestEffort => warn!(
                    "{API_KEY_VAR} not set. Data retrieval may fail if FRED limits unauthenticated requests."
                ),
            }
        }
        Ok(Self {
            client: Client::new(),
            api_key,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.api_key.is_some()
    }

    fn fetch_json(
        &self,
        series_id: &str,
        api_key: &str,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Observation>, AppError> {
        let start = start.to_string();
        let mut req = self.client.get(API_URL).query(&[
            ("series_id", series_id),
            ("api_key", api_key),
            ("file_type", "json"),
            ("observation_start", start.as_str()),
        ]);
        if let Some(date) = end {
            req = req.query(&[("observation_end", date.to_string())]);
        }

        debug!(series_id, "requesting FRED observations (api)");
        let body = send(series_id, req)?;
        parse_observations_json(series_id, &body)
    }

    fn fetch_csv(
        &self,
        series_id: &str,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Observation>, AppError> {
        let start = start.to_string();
        let mut req = self
            .client
            .get(GRAPH_CSV_URL)
            .query(&[("id", series_id), ("cosd", start.as_str())]);
        if let Some(date) = end {
            req = req.query(&[("coed", date.to_string())]);
        }

        debug!(series_id, "requesting FRED observations (fredgraph.csv)");
        let body = send(series_id, req)?;
        parse_graph_csv(series_id, &body)
    }
}

impl SeriesSource for FredClient {
    fn fetch_series(
        &self,
        series_id: &str,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Observation>, AppError> {
        match &self.api_key {
            Some(key) => self.fetch_json(series_id, key, start, end),
            None => self.fetch_csv(series_id, start, end),
        }
    }
}

/// A blank key is treated the same as no key at all.
fn usable_api_key(raw: Option<String>) -> Option<String> {
    raw.filter(|k| !k.trim().is_empty())
}

fn send(series_id: &str, req: reqwest::blocking::RequestBuilder) -> Result<String, AppError> {
    let resp = req
        .send()
        .map_err(|e| AppError::retrieval(series_id, format!("request failed: {e}")))?;

    let status = resp.status();
    let body = resp
        .text()
        .map_err(|e| AppError::retrieval(series_id, format!("failed to read response: {e}")))?;

    if !status.is_success() {
        let reason = match parse_error_message(&body) {
            Some(message) => format!("status {status}: {message}"),
            None => format!("status {status}"),
        };
        return Err(AppError::retrieval(series_id, reason));
    }

    Ok(body)
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<RawObservation>,
}

#[derive(Debug, Deserialize)]
struct RawObservation {
    date: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error_message: String,
}

/// Parse a `series/observations` JSON body.
pub fn parse_observations_json(series_id: &str, body: &str) -> Result<Vec<Observation>, AppError> {
    let parsed: ObservationsResponse = serde_json::from_str(body)
        .map_err(|e| AppError::retrieval(series_id, format!("failed to parse FRED response: {e}")))?;

    parsed
        .observations
        .iter()
        .map(|obs| observation(series_id, &obs.date, &obs.value))
        .collect()
}

/// Parse a `fredgraph.csv` body (`<date column>,<series id>`).
pub fn parse_graph_csv(series_id: &str, body: &str) -> Result<Vec<Observation>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .cloned()
        .map_err(|e| AppError::retrieval(series_id, format!("invalid CSV: {e}")))?;
    let date_header = headers.get(0).unwrap_or("");
    let is_date_column =
        date_header.eq_ignore_ascii_case("observation_date") || date_header.eq_ignore_ascii_case("date");
    if headers.len() != 2 || !is_date_column {
        return Err(AppError::retrieval(
            series_id,
            format!("unexpected CSV header '{}'", headers.iter().collect::<Vec<_>>().join(",")),
        ));
    }

    let mut out = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| AppError::retrieval(series_id, format!("invalid CSV row: {e}")))?;
        let date = record.get(0).unwrap_or("");
        let value = record.get(1).unwrap_or("");
        out.push(observation(series_id, date, value)?);
    }
    Ok(out)
}

fn parse_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .map(|e| e.error_message.trim().to_string())
        .filter(|m| !m.is_empty())
}

fn observation(series_id: &str, date: &str, value: &str) -> Result<Observation, AppError> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|e| AppError::retrieval(series_id, format!("invalid FRED date '{date}': {e}")))?;
    Ok(Observation {
        date,
        value: parse_value(value),
    })
}

/// FRED marks missing observations with `"."`.
fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
