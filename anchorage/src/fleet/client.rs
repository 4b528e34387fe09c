// Copyright 2020 Zachary Stewart
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! HTTP client for the remote fleet service.
use std::{future::Future, time::Duration};

use tracing::{debug, instrument};

use crate::fleet::{FleetError, FleetResponse};

/// Endpoint that hands out a random fleet and anchorage size.
pub const DEFAULT_URL: &str = "https://esa.instech.no/api/fleets/random";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the fleet service.
#[derive(Debug, Clone)]
pub struct FleetClient {
    http: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl FleetClient {
    /// Creates a client for the public random-fleet endpoint.
    pub fn new() -> Self {
        Self::with_url(DEFAULT_URL)
    }

    /// Creates a client that fetches from a custom URL.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Replace the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch and decode one fleet descriptor.
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn fetch_random_fleet(&self) -> Result<FleetResponse, FleetError> {
        debug!("requesting fleet");
        let response = self
            .http
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FleetError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let fleet = FleetResponse::from_json(&body)?;
        debug!(
            width = fleet.anchorage_size.width,
            height = fleet.anchorage_size.height,
            groups = fleet.fleets.len(),
            "received fleet"
        );
        Ok(fleet)
    }

    /// Like [`FleetClient::fetch_random_fleet`], but gives up with
    /// [`FleetError::Cancelled`] as soon as `cancel` completes.
    pub async fn fetch_random_fleet_until<C>(&self, cancel: C) -> Result<FleetResponse, FleetError>
    where
        C: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            _ = cancel => {
                debug!("fleet fetch cancelled");
                Err(FleetError::Cancelled)
            }
            fleet = self.fetch_random_fleet() => fleet,
        }
    }
}

impl Default for FleetClient {
    fn default() -> Self {
        Self::new()
    }
}
