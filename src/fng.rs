/*
 *  fng.rs
 *
 *  FnGShim - fear and greed at a glance
 *	(c) 2020-26 Stuart Hunter
 *
 *  Fear & Greed index client
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */
use serde::Deserialize;
use reqwest::{Client, header};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Custom error type for index fetches.
#[derive(Debug, Error)]
pub enum FngError {
    /// DNS, refused, timeout or a non 2xx status
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    /// Body was not the JSON we expect
    #[error("JSON deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Missing index data: {0}")]
    MissingData(String),
    #[error("Index value {0} outside 0-100")]
    OutOfRange(f64),
}

impl FngError {
    /// Network level failure as opposed to a bad payload
    pub fn is_connection(&self) -> bool {
        matches!(self, FngError::Http(_))
    }
}

/// One index sample and when the next one is due
#[derive(Debug, Clone, PartialEq)]
pub struct FngReading {
    pub value: f32,
    /// seconds, straight from the server (may be zero or negative)
    pub time_until_update: i64,
    pub classification: Option<String>,
}

impl fmt::Display for FngReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.classification {
            Some(c) => write!(f, "{} ({})", self.value, c),
            None => write!(f, "{}", self.value),
        }
    }
}

/// Anything that can hand the monitor a fresh reading
#[allow(async_fn_in_trait)]
pub trait DataSource {
    async fn get_new_data(&self) -> Result<FngReading, FngError>;
}

/// Server sends numbers as strings, accept both
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Numeric {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Numeric {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Numeric::Int(i) => Some(*i as f64),
            Numeric::Float(f) => Some(*f),
            Numeric::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FngResponse {
    #[serde(default)]
    data: Vec<FngEntry>,
}

#[derive(Debug, Deserialize)]
struct FngEntry {
    value: Option<Numeric>,
    time_until_update: Option<Numeric>,
    value_classification: Option<String>,
}

/// Pull the newest reading (last element of `data`) out of a response body
pub fn parse_response(body: &str) -> Result<FngReading, FngError> {
    let response: FngResponse = serde_json::from_str(body)?;
    let latest = response.data
        .last()
        .ok_or_else(|| FngError::MissingData("empty data array".to_string()))?;

    let value = latest.value
        .as_ref()
        .and_then(Numeric::as_f64)
        .ok_or_else(|| FngError::MissingData("value".to_string()))?;
    if !(0.0..=100.0).contains(&value) {
        return Err(FngError::OutOfRange(value));
    }

    let time_until_update = latest.time_until_update
        .as_ref()
        .and_then(Numeric::as_f64)
        .ok_or_else(|| FngError::MissingData("time_until_update".to_string()))?;

    Ok(FngReading {
        value: value as f32,
        time_until_update: time_until_update as i64,
        classification: latest.value_classification.clone(),
    })
}

/// HTTP client for the alternative.me endpoint
#[derive(Debug)]
pub struct FearGreedClient {
    url: String,
    client: Client,
}

impl FearGreedClient {
    pub fn new(url: &str, connect_timeout: Duration, timeout: Duration) -> Result<Self, FngError> {
        const VERSION: &str = concat!("FnGShim ", env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));

        let mut headers = header::HeaderMap::new();
        headers.insert("User-Agent", header::HeaderValue::from_static(VERSION));
        headers.insert("Accept", header::HeaderValue::from_static("application/json"));
        headers.insert("Connection", header::HeaderValue::from_static("close"));

        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { url: url.to_string(), client })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl DataSource for FearGreedClient {
    async fn get_new_data(&self) -> Result<FngReading, FngError> {
        let body = self.client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()? // none 2xx raise
            .text()
            .await?;
        parse_response(&body)
    }
}
