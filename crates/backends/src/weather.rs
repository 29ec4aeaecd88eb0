//! Weather service client: current conditions plus hourly/daily forecasts.

use crate::envelope::ServiceClient;
use async_trait::async_trait;
use ragloop_core::backend::WeatherService;
use ragloop_core::error::BackendError;
use serde_json::json;

pub struct HttpWeatherService {
    client: ServiceClient,
}

impl HttpWeatherService {
    pub fn new(base_url: impl Into<String>, timeout: std::time::Duration) -> Result<Self, BackendError> {
        Ok(Self {
            client: ServiceClient::new(base_url, timeout)?,
        })
    }
}

#[async_trait]
impl WeatherService for HttpWeatherService {
    async fn current(&self, location: &str) -> Result<serde_json::Value, BackendError> {
        self.client
            .post("/weather/current", &json!({ "location": location }))
            .await
    }

    async fn hourly(&self, location: &str, hours: u32) -> Result<serde_json::Value, BackendError> {
        self.client
            .post("/weather/hourly", &json!({ "location": location, "hours": hours }))
            .await
    }

    async fn daily(&self, location: &str, days: u32) -> Result<serde_json::Value, BackendError> {
        self.client
            .post("/weather/daily", &json!({ "location": location, "days": days }))
            .await
    }
}
