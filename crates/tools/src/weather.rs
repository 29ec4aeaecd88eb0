//! Weather tools: current conditions, hourly forecast, daily forecast.

use async_trait::async_trait;
use ragloop_core::backend::WeatherService;
use ragloop_core::error::ToolError;
use ragloop_core::tool::{Tool, ToolResult};
use serde::Deserialize;
use std::sync::Arc;

fn parse_args<T: serde::de::DeserializeOwned>(arguments: serde_json::Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherArgs {
    location: String,
}

pub struct CurrentWeatherTool {
    service: Arc<dyn WeatherService>,
}

impl CurrentWeatherTool {
    pub fn new(service: Arc<dyn WeatherService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for CurrentWeatherTool {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Look up current weather conditions for a location."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "The city name to look up weather for"
                }
            },
            "required": ["location"]
        })
    }

    async fn invoke(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: CurrentWeatherArgs = parse_args(arguments)?;
        let payload = self.service.current(&args.location).await?;
        Ok(ToolResult::success(self.name(), payload))
    }
}

#[derive(Debug, Deserialize)]
struct HourlyWeatherArgs {
    location: String,
    #[serde(default = "default_hours")]
    hours: u32,
}

fn default_hours() -> u32 {
    24
}

pub struct HourlyWeatherTool {
    service: Arc<dyn WeatherService>,
}

impl HourlyWeatherTool {
    pub fn new(service: Arc<dyn WeatherService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for HourlyWeatherTool {
    fn name(&self) -> &str {
        "get_hourly_weather"
    }

    fn description(&self) -> &str {
        "Get an hour-by-hour weather forecast for a location."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "The city name to forecast"
                },
                "hours": {
                    "type": "integer",
                    "description": "How many hours ahead (default: 24)",
                    "default": 24
                }
            },
            "required": ["location"]
        })
    }

    async fn invoke(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: HourlyWeatherArgs = parse_args(arguments)?;
        let payload = self.service.hourly(&args.location, args.hours).await?;
        Ok(ToolResult::success(self.name(), payload))
    }
}

#[derive(Debug, Deserialize)]
struct DailyWeatherArgs {
    location: String,
    #[serde(default = "default_days")]
    days: u32,
}

fn default_days() -> u32 {
    7
}

pub struct DailyWeatherTool {
    service: Arc<dyn WeatherService>,
}

impl DailyWeatherTool {
    pub fn new(service: Arc<dyn WeatherService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for DailyWeatherTool {
    fn name(&self) -> &str {
        "get_daily_weather"
    }

    fn description(&self) -> &str {
        "Get a multi-day weather forecast for a location."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "The city name to forecast"
                },
                "days": {
                    "type": "integer",
                    "description": "How many days ahead (default: 7)",
                    "default": 7
                }
            },
            "required": ["location"]
        })
    }

    async fn invoke(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: DailyWeatherArgs = parse_args(arguments)?;
        let payload = self.service.daily(&args.location, args.days).await?;
        Ok(ToolResult::success(self.name(), payload))
    }
}
