// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shiksha_model::DashboardSnapshot;
use std::time::Duration;

/// Lighter summary variant served by `/api/analytics/overview`; used by
/// startup checks and trend-only consumers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Overview {
    #[serde(default)]
    pub attendance_trend: Vec<AttendancePoint>,
    #[serde(default)]
    pub apaar_trend: Vec<ApaarPoint>,
    #[serde(default)]
    pub states: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AttendancePoint {
    pub month: String,
    pub attendance: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApaarPoint {
    pub month: String,
    pub apaar_ids: u64,
}

/// Blocking client for the analytics backend. One base URL selects local
/// vs deployed; every request carries the configured timeout.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("api.base_url must not be empty");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn full_data(&self) -> Result<DashboardSnapshot> {
        self.get_json("/api/analytics/full-data")
    }

    pub fn overview(&self) -> Result<Overview> {
        self.get_json("/api/analytics/overview")
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;
        decode_response(response, path)
    }

    /// POST a JSON body and decode the JSON reply. Other crates build
    /// their endpoint wrappers on this so error reporting stays uniform.
    pub fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;
        decode_response(response, path)
    }
}

fn decode_response<T: DeserializeOwned>(
    response: reqwest::blocking::Response,
    path: &str,
) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(clean_error_response(status, &body));
    }
    response
        .json()
        .with_context(|| format!("decode response from {path}"))
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!(
        "cannot reach {} -- check api.base_url or start the backend locally ({})",
        base_url,
        error
    )
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body)
        && let Some(detail) = parsed.detail
        && !detail.is_empty()
    {
        return anyhow!("server error ({}): {}", status.as_u16(), detail);
    }

    if body.len() < 100 && !body.contains('{') && !body.is_empty() {
        return anyhow!("server error ({}): {}", status.as_u16(), body);
    }

    anyhow!("server returned {}", status.as_u16())
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    detail: Option<String>,
}
