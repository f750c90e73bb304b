//! REST API client for the school backend's attendance endpoints.
//!
//! Wraps `GET /attendance/by-class/` and `POST /attendance/bulk/` using
//! [`reqwest`], attaching the configured bearer token to every request.

use chrono::NaiveDate;
use serde::Deserialize;

use rollcall_core::attendance::{RosterEntry, SaveRequest};
use rollcall_core::grades::Grade;

use crate::config::ClientConfig;

/// HTTP client for one backend.
pub struct AttendanceApi {
    client: reqwest::Client,
    config: ClientConfig,
}

/// Body returned by `GET /attendance/by-class/`.
#[derive(Debug, Deserialize)]
pub struct RosterResponse {
    /// Absent when the class has no enrolled students.
    #[serde(default)]
    pub students: Option<Vec<RosterEntry>>,
}

/// Body returned by `POST /attendance/bulk/`.
#[derive(Debug, Deserialize)]
pub struct SaveResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Errors from the attendance REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("Backend API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl ApiError {
    /// Short, user-presentable reason taken from the backend's JSON error
    /// body (`error`, `message` or `detail` field), if there is one.
    pub fn detail(&self) -> Option<String> {
        let ApiError::Api { body, .. } = self else {
            return None;
        };
        let json: serde_json::Value = serde_json::from_str(body).ok()?;
        ["error", "message", "detail"]
            .iter()
            .find_map(|field| json.get(*field).and_then(|v| v.as_str()))
            .map(str::to_string)
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Request(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

impl AttendanceApi {
    /// Create a client with its own connection pool and the configured
    /// request timeout.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: ClientConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch the roster of `grade` for `date`.
    ///
    /// A body without a `students` array is an empty roster.
    pub async fn fetch_roster(
        &self,
        grade: Grade,
        date: NaiveDate,
    ) -> Result<Vec<RosterEntry>, ApiError> {
        let date = date.to_string();
        let request = self
            .client
            .get(format!("{}/attendance/by-class/", self.config.api_url))
            .query(&[("grade", grade.code()), ("date", date.as_str())]);

        let response = self.authorize(request).send().await?;
        let body: RosterResponse = Self::parse_response(response).await?;
        Ok(body.students.unwrap_or_default())
    }

    /// Persist attendance rows for one date.
    ///
    /// Used for both single-record silent saves and whole-roster saves; the
    /// backend upserts per student and date.
    pub async fn save_attendance(&self, request: &SaveRequest) -> Result<SaveResponse, ApiError> {
        let builder = self
            .client
            .post(format!("{}/attendance/bulk/", self.config.api_url))
            .json(request);

        let response = self.authorize(builder).send().await?;
        Self::parse_response(response).await
    }

    // ---- private helpers ----

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Ensure the response has a success status code, otherwise return an
    /// [`ApiError::Api`] carrying the status and body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::debug!(status = status.as_u16(), body = %body, "Backend returned an error");
            return Err(ApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
