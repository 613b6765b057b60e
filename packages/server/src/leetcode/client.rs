use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// Errors from the external submission service. Any of these aborts the
/// whole fetch; there is no automatic retry.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("authentication with the submission service failed: {0}")]
    Authentication(String),
    #[error("submission service request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected response from the submission service: {0}")]
    Response(String),
}

/// Submission status string the external service uses for passing runs.
pub const ACCEPTED_STATUS: &str = "Accepted";

/// One attempt record from the external service, accepted or not.
#[derive(Clone, Debug, Deserialize)]
pub struct RawSubmission {
    pub title: String,
    pub title_slug: String,
    pub status_display: String,
    pub lang: String,
    /// Submission time, epoch seconds.
    pub timestamp: i64,
}

impl RawSubmission {
    pub fn is_accepted(&self) -> bool {
        self.status_display == ACCEPTED_STATUS
    }

    pub fn solved_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.timestamp, 0).unwrap_or_else(Utc::now)
    }
}

/// Proof that a credential was accepted by the external service. Carries
/// the session cookie used for all subsequent page requests.
#[derive(Clone, Debug)]
pub struct Session {
    cookie: String,
}

impl Session {
    pub fn new(cookie: impl Into<String>) -> Self {
        Self {
            cookie: cookie.into(),
        }
    }

    pub fn cookie(&self) -> &str {
        &self.cookie
    }
}

/// Seam to the external coding-practice site. Production uses the HTTP
/// client below; tests substitute scripted fakes.
#[async_trait]
pub trait SubmissionSource: Send + Sync {
    /// Validate the credential once, before any page is requested.
    async fn authenticate(&self, credential: &str) -> Result<Session, FetchError>;

    /// Fetch one page of submission history, most recent first.
    async fn fetch_page(
        &self,
        session: &Session,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<RawSubmission>, FetchError>;
}

#[derive(Deserialize)]
struct SubmissionsPage {
    submissions_dump: Vec<RawSubmission>,
}

/// reqwest-backed source talking to the LeetCode-style REST API.
pub struct HttpSubmissionSource {
    http: reqwest::Client,
    base_url: String,
}

impl HttpSubmissionSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl SubmissionSource for HttpSubmissionSource {
    async fn authenticate(&self, credential: &str) -> Result<Session, FetchError> {
        let response = self
            .http
            .get(format!("{}/api/user/", self.base_url))
            .header(reqwest::header::COOKIE, credential)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Authentication(format!(
                "credential rejected with status {}",
                response.status()
            )));
        }

        Ok(Session::new(credential))
    }

    async fn fetch_page(
        &self,
        session: &Session,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<RawSubmission>, FetchError> {
        let response = self
            .http
            .get(format!("{}/api/submissions/", self.base_url))
            .query(&[("offset", offset), ("limit", limit)])
            .header(reqwest::header::COOKIE, session.cookie())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Response(format!(
                "submission page at offset {offset} returned status {status}"
            )));
        }

        let page: SubmissionsPage = response
            .json()
            .await
            .map_err(|e| FetchError::Response(format!("malformed submission page: {e}")))?;

        Ok(page.submissions_dump)
    }
}
