//! Typed client for the openF1 data API.
//!
//! Three read-only endpoints (sessions, drivers, laps), each one HTTP GET
//! with query-string filters returning a JSON array of flat records. The
//! client is a stateless pass-through: no caching, no retries, no local
//! store. All keys originate upstream.
//!
//! The upstream does not distinguish an invalid session key from a session
//! with no data; both come back as an empty array and are surfaced as such.

mod types;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::{Error, Result, Service};

pub use types::{lap_matches, Driver, Lap, Session, SessionFilters, SessionType};

/// Read access to F1 data, as the conversation loop sees it.
///
/// The production implementation is [`OpenF1Client`]; tests substitute
/// canned data.
#[async_trait]
pub trait F1Data: Send + Sync {
    async fn sessions(&self, filters: &SessionFilters) -> Result<Vec<Session>>;

    async fn drivers(&self, session_key: &str) -> Result<Vec<Driver>>;

    async fn laps(
        &self,
        session_key: &str,
        driver_number: Option<u32>,
        lap_number: Option<u32>,
    ) -> Result<Vec<Lap>>;
}

/// HTTP client for `api.openf1.org`.
pub struct OpenF1Client {
    base_url: String,
    timeout: std::time::Duration,
}

impl OpenF1Client {
    pub fn new(config: &Config) -> Self {
        Self {
            base_url: config.openf1_base_url.trim_end_matches('/').to_string(),
            timeout: config.request_timeout,
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!(%url, ?query, "fetching openF1 records");

        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|source| Error::Network {
                service: Service::OpenF1,
                source,
            })?;

        let response = http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|source| Error::Network {
                service: Service::OpenF1,
                source,
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|source| Error::Network {
            service: Service::OpenF1,
            source,
        })?;

        if !status.is_success() {
            return Err(Error::Upstream {
                service: Service::OpenF1,
                status: status.as_u16(),
                message: text.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&text).map_err(|e| Error::MalformedResponse {
            service: Service::OpenF1,
            detail: format!("{}", e),
        })
    }
}

#[async_trait]
impl F1Data for OpenF1Client {
    /// Fetch sessions matching the given filters.
    ///
    /// Year, session type, and session name are applied upstream as query
    /// parameters. Country is matched locally and case-insensitively (the
    /// upstream comparison is exact), and the full filter set is re-applied
    /// to the result either way.
    async fn sessions(&self, filters: &SessionFilters) -> Result<Vec<Session>> {
        let mut query = Vec::new();
        if let Some(year) = filters.year {
            query.push(("year", year.to_string()));
        }
        if let Some(session_type) = filters.session_type {
            query.push(("session_type", session_type.as_str().to_string()));
        }
        if let Some(name) = &filters.session_name {
            query.push(("session_name", name.clone()));
        }

        let sessions: Vec<Session> = self.fetch("sessions", &query).await?;
        Ok(sessions.into_iter().filter(|s| filters.matches(s)).collect())
    }

    /// Fetch the driver list for a session. `session_key` may be the
    /// upstream alias `latest`.
    async fn drivers(&self, session_key: &str) -> Result<Vec<Driver>> {
        let query = [("session_key", session_key.to_string())];
        self.fetch("drivers", &query).await
    }

    /// Fetch laps for a session, optionally narrowed to one driver and one
    /// lap number. Filters are passed upstream and re-applied locally, so
    /// omitted filters never narrow the result.
    async fn laps(
        &self,
        session_key: &str,
        driver_number: Option<u32>,
        lap_number: Option<u32>,
    ) -> Result<Vec<Lap>> {
        let mut query = vec![("session_key", session_key.to_string())];
        if let Some(driver) = driver_number {
            query.push(("driver_number", driver.to_string()));
        }
        if let Some(number) = lap_number {
            query.push(("lap_number", number.to_string()));
        }

        let laps: Vec<Lap> = self.fetch("laps", &query).await?;
        Ok(laps
            .into_iter()
            .filter(|lap| lap_matches(lap, driver_number, lap_number))
            .collect())
    }
}
