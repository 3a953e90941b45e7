//! Submission client for the site feedback list.
//!
//! One call shape: POST `{site_root}/feedback-list/items` with a JSON
//! `{Title, URL}` body. The list store answers 201 when the item was
//! created; anything else is reported back to the caller unchanged. No
//! retry and no timeout handling: a failed attempt surfaces immediately
//! and the user resubmits by hand.
//!
//! `Real` talks to an actual site, `Mock` records submissions in memory
//! for tests and the `--use-mock-server` mode.

use std::{
    sync::{Arc, Mutex},
    thread::sleep,
    time::Duration,
};

use color_eyre::{
    Result,
    eyre::{Context, eyre},
};
use reqwest::{StatusCode, blocking::Client, header};
use serde::{Deserialize, Serialize};

/// Path of the collection endpoint, relative to the site root.
pub const API_PATH: &str = "/feedback-list/items";

/// Status the list store answers with when an item was created.
pub const STATUS_CREATED: u16 = 201;

/// The wire shape of one submitted comment.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FeedbackRecord {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "URL")]
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct SubmitResponse {
    pub status: u16,
    pub status_text: String,
}

impl SubmitResponse {
    pub fn created(&self) -> bool {
        self.status == STATUS_CREATED
    }

    fn from_status(status: StatusCode) -> Self {
        Self {
            status: status.as_u16(),
            // reqwest exposes no server reason phrase; the canonical one is
            // what user-facing error codes are formatted from
            status_text: status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.as_u16().to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub enum FeedbackSubmitter {
    Real(RealSubmitter),
    Mock(MockSubmitter),
}

impl From<RealSubmitter> for FeedbackSubmitter {
    fn from(submitter: RealSubmitter) -> Self {
        FeedbackSubmitter::Real(submitter)
    }
}
impl From<MockSubmitter> for FeedbackSubmitter {
    fn from(submitter: MockSubmitter) -> Self {
        FeedbackSubmitter::Mock(submitter)
    }
}

impl Default for FeedbackSubmitter {
    fn default() -> Self {
        Self::Real(RealSubmitter::default())
    }
}

impl FeedbackSubmitter {
    /// Deliver one record. `Err` means the transport failed and no response
    /// status exists; an unexpected status is an `Ok` the caller inspects.
    pub fn submit(&self, record: &FeedbackRecord) -> Result<SubmitResponse> {
        match self {
            FeedbackSubmitter::Real(s) => s.submit(record),
            FeedbackSubmitter::Mock(s) => s.submit(record),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RealSubmitter {
    site_root: String,
}

impl RealSubmitter {
    pub fn site_root<T: Into<String>>(self, site_root: T) -> Self {
        Self {
            site_root: site_root.into(),
        }
    }

    fn submit(&self, record: &FeedbackRecord) -> Result<SubmitResponse> {
        let client = Client::new();

        let body = serde_json::to_string(record).context("Failed to serialize feedback record")?;

        let response = client
            .post(format!("{}{}", self.site_root, API_PATH))
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .body(body)
            .send()
            .with_context(|| format!("Failed to reach {}{}", self.site_root, API_PATH))?;

        Ok(SubmitResponse::from_status(response.status()))
    }
}

#[derive(Debug, Clone)]
pub struct MockSubmitter {
    sim_delay: Option<Duration>,
    status: u16,
    fail_transport: bool,
    sent: Arc<Mutex<Vec<FeedbackRecord>>>,
}

impl Default for MockSubmitter {
    fn default() -> Self {
        Self {
            sim_delay: None,
            status: STATUS_CREATED,
            fail_transport: false,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl MockSubmitter {
    #[allow(dead_code)]
    pub fn set_sim_delay(self, duration: Duration) -> Self {
        Self {
            sim_delay: Some(duration),
            ..self
        }
    }

    #[allow(dead_code)]
    pub fn respond_with(self, status: u16) -> Self {
        Self { status, ..self }
    }

    #[allow(dead_code)]
    pub fn fail_transport(self) -> Self {
        Self {
            fail_transport: true,
            ..self
        }
    }

    /// Everything delivered to this mock so far.
    #[allow(dead_code)]
    pub fn sent(&self) -> Vec<FeedbackRecord> {
        self.sent.lock().unwrap().clone()
    }

    fn submit(&self, record: &FeedbackRecord) -> Result<SubmitResponse> {
        if let Some(d) = self.sim_delay {
            sleep(d);
        }

        if self.fail_transport {
            return Err(eyre!("simulated connection failure"));
        }

        self.sent.lock().unwrap().push(record.clone());

        let status = StatusCode::from_u16(self.status)
            .with_context(|| format!("Mock configured with invalid status {}", self.status))?;
        Ok(SubmitResponse::from_status(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> FeedbackRecord {
        FeedbackRecord {
            title: "Great app".into(),
            url: "https://example.com/site/pages/news".into(),
        }
    }

    #[test]
    fn test_record_wire_shape() {
        let value = serde_json::to_value(record()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "Title": "Great app",
                "URL": "https://example.com/site/pages/news",
            })
        );
    }

    #[test]
    fn test_submit_created() {
        let mut server = mockito::Server::new();

        let mock = server
            .mock("POST", "/feedback-list/items")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "Title": "Great app",
                "URL": "https://example.com/site/pages/news",
            })))
            .with_status(201)
            .expect(1)
            .create();

        let submitter = RealSubmitter::default().site_root(server.url());
        let response = submitter.submit(&record()).unwrap();

        assert!(response.created());
        assert_eq!(response.status, 201);
        assert_eq!(response.status_text, "Created");

        mock.assert();
    }

    #[test]
    fn test_submit_server_error() {
        let mut server = mockito::Server::new();

        let mock = server
            .mock("POST", "/feedback-list/items")
            .with_status(500)
            .create();

        let submitter = RealSubmitter::default().site_root(server.url());
        let response = submitter.submit(&record()).unwrap();

        assert!(!response.created());
        assert_eq!(response.status, 500);
        assert_eq!(response.status_text, "Internal Server Error");

        mock.assert();
    }

    #[test]
    fn test_submit_transport_failure() {
        // .invalid never resolves
        let submitter = RealSubmitter::default().site_root("http://feedback.invalid");
        assert!(submitter.submit(&record()).is_err());
    }

    #[test]
    fn test_mock_records_submissions() {
        let mock = MockSubmitter::default();
        let response = mock.submit(&record()).unwrap();

        assert!(response.created());
        assert_eq!(mock.sent(), vec![record()]);
    }

    #[test]
    fn test_mock_respond_with() {
        let mock = MockSubmitter::default().respond_with(403);
        let response = mock.submit(&record()).unwrap();

        assert!(!response.created());
        assert_eq!(response.status_text, "Forbidden");
    }

    #[test]
    fn test_mock_transport_failure_records_nothing() {
        let mock = MockSubmitter::default().fail_transport();
        assert!(mock.submit(&record()).is_err());
        assert!(mock.sent().is_empty());
    }
}
