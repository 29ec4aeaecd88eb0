//! Envelope normalization shared by all backend clients.

use ragloop_core::error::BackendError;
use serde::Deserialize;
use tracing::debug;

/// The uniform response envelope of every backend service.
///
/// `code == 0` is success; anything else carries `msg` as the cause.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Envelope {
    /// Unwrap into the data payload or a service error.
    pub fn into_data(self) -> Result<serde_json::Value, BackendError> {
        if self.code == 0 {
            Ok(self.data)
        } else {
            Err(BackendError::Service {
                code: self.code,
                message: self.msg,
            })
        }
    }
}

/// A thin JSON-over-HTTP client for one backend service.
///
/// All tool backends share this shape: POST a JSON body to a path under the
/// base URL, get an envelope back.
#[derive(Clone)]
pub struct ServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl ServiceClient {
    pub fn new(base_url: impl Into<String>, timeout: std::time::Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Network(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// POST `body` to `path` and unwrap the response envelope.
    pub async fn post(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, BackendError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "Backend request");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BackendError::Timeout(e.to_string())
                } else {
                    BackendError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Http {
                status_code: status,
                message: body,
            });
        }

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;

        envelope.into_data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_yields_data() {
        let env: Envelope =
            serde_json::from_str(r#"{"code":0,"msg":"ok","data":{"temperature":20}}"#).unwrap();
        let data = env.into_data().unwrap();
        assert_eq!(data["temperature"], 20);
    }

    #[test]
    fn nonzero_code_is_service_error() {
        let env: Envelope =
            serde_json::from_str(r#"{"code":500,"msg":"weather upstream down","data":null}"#)
                .unwrap();
        let err = env.into_data().unwrap_err();
        match err {
            BackendError::Service { code, message } => {
                assert_eq!(code, 500);
                assert_eq!(message, "weather upstream down");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_fields_default_to_success_null() {
        let env: Envelope = serde_json::from_str(r#"{}"#).unwrap();
        let data = env.into_data().unwrap();
        assert!(data.is_null());
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client =
            ServiceClient::new("http://localhost:8084/", std::time::Duration::from_secs(5))
                .unwrap();
        assert_eq!(client.base_url, "http://localhost:8084");
    }
}
