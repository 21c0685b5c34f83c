//! Cloud OCR boundary for scanned documents.
//!
//! The Read service runs recognition as a server-side asynchronous job:
//! an image is submitted, the service answers with an operation URL, and
//! the caller polls that URL until the job reaches a terminal status.
//! Only a succeeded job yields text.
//!
//! The service is abstracted behind [`OcrService`] so the PDF acquirer
//! takes it as an injected collaborator; [`ReadOcrClient`] is the blocking
//! HTTP implementation against an Azure-compatible Read v3.2 endpoint.
//!
//! # Environment Variables
//!
//! - `DOX_OCR_ENDPOINT`: base URL of the Read service
//! - `DOX_OCR_KEY`: subscription key
//!
//! Credentials are not validated up front: a missing or rejected key
//! surfaces as an authentication error at the first submission.

use std::time::Duration;

use serde::Deserialize;

use crate::config::OcrConfig;
use crate::error::{ExtractError, Result};

/// Fixed sleep between status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Handle to a server-side recognition job.
#[derive(Debug, Clone)]
pub struct OcrJob {
    /// Operation URL returned by the service at submission time.
    pub operation_url: String,
}

/// Status of a recognition job as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    NotStarted,
    Running,
    /// Recognition finished; recognized lines in detection order.
    Succeeded(Vec<String>),
    Failed,
    /// A terminal status this client does not know about.
    Other(String),
}

impl JobState {
    /// Whether the job is still in flight and worth polling again.
    pub fn is_pending(&self) -> bool {
        matches!(self, JobState::NotStarted | JobState::Running)
    }
}

/// OCR service boundary: submit one image, poll the job to terminal status.
pub trait OcrService {
    /// Submit PNG bytes for recognition, returning a job handle.
    fn submit(&self, png: &[u8]) -> Result<OcrJob>;

    /// Fetch the current status of a submitted job.
    fn poll(&self, job: &OcrJob) -> Result<JobState>;
}

/// Poll schedule for one OCR job.
#[derive(Debug, Clone)]
pub struct PollPolicy {
    /// Sleep between polls.
    pub interval: Duration,
    /// Maximum number of polls before giving up with
    /// [`ExtractError::Timeout`]. `None` waits without bound, which is
    /// the historical behavior of this pipeline.
    pub max_attempts: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: None,
        }
    }
}

impl PollPolicy {
    /// A bounded policy: at most `max_attempts` polls at `interval`.
    pub fn bounded(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: Some(max_attempts),
        }
    }
}

/// Poll `job` until it leaves the pending states.
///
/// Transport errors from the service propagate immediately. With a
/// bounded policy, exhausting the budget returns [`ExtractError::Timeout`].
pub fn poll_to_completion(
    service: &dyn OcrService,
    job: &OcrJob,
    policy: &PollPolicy,
) -> Result<JobState> {
    let mut attempts: u32 = 0;
    loop {
        let state = service.poll(job)?;
        if !state.is_pending() {
            return Ok(state);
        }
        attempts += 1;
        if let Some(max) = policy.max_attempts {
            if attempts >= max {
                return Err(ExtractError::Timeout);
            }
        }
        std::thread::sleep(policy.interval);
    }
}

/// Blocking HTTP client for an Azure-compatible Read v3.2 service.
pub struct ReadOcrClient {
    agent: ureq::Agent,
    endpoint: String,
    key: String,
}

impl ReadOcrClient {
    /// Build a client from configuration.
    ///
    /// No network traffic happens here; bad credentials are only
    /// discovered at the first [`OcrService::submit`] call.
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout(Duration::from_secs(30))
                .build(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            key: config.key.clone(),
        }
    }
}

impl OcrService for ReadOcrClient {
    fn submit(&self, png: &[u8]) -> Result<OcrJob> {
        let url = format!("{}/vision/v3.2/read/analyze", self.endpoint);
        let response = self
            .agent
            .post(&url)
            .set("Ocp-Apim-Subscription-Key", &self.key)
            .set("Content-Type", "application/octet-stream")
            .send_bytes(png)
            .map_err(map_transport_error)?;

        let operation_url = response
            .header("Operation-Location")
            .ok_or_else(|| {
                ExtractError::Ocr("Read service response missing Operation-Location".to_string())
            })?
            .to_string();

        tracing::debug!("OCR job submitted: {}", operation_url);
        Ok(OcrJob { operation_url })
    }

    fn poll(&self, job: &OcrJob) -> Result<JobState> {
        let response = self
            .agent
            .get(&job.operation_url)
            .set("Ocp-Apim-Subscription-Key", &self.key)
            .call()
            .map_err(map_transport_error)?;

        let envelope: ReadEnvelope = response
            .into_json()
            .map_err(|e| ExtractError::Ocr(format!("Failed to decode read result: {e}")))?;

        Ok(envelope.into_state())
    }
}

fn map_transport_error(err: ureq::Error) -> ExtractError {
    match err {
        ureq::Error::Status(code @ (401 | 403), response) => {
            ExtractError::Auth(format!("{code} {}", response.status_text()))
        }
        ureq::Error::Status(code, response) => {
            ExtractError::Ocr(format!("Read service returned {code} {}", response.status_text()))
        }
        ureq::Error::Transport(transport) => ExtractError::Ocr(transport.to_string()),
    }
}

/// Wire format of the Read v3.2 operation result.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReadEnvelope {
    status: String,
    analyze_result: Option<AnalyzeResult>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResult {
    read_results: Vec<ReadResult>,
}

#[derive(Deserialize)]
struct ReadResult {
    #[serde(default)]
    lines: Vec<ReadLine>,
}

#[derive(Deserialize)]
struct ReadLine {
    text: String,
}

impl ReadEnvelope {
    fn into_state(self) -> JobState {
        match self.status.as_str() {
            "notStarted" => JobState::NotStarted,
            "running" => JobState::Running,
            "succeeded" => {
                let lines = self
                    .analyze_result
                    .map(|ar| {
                        ar.read_results
                            .into_iter()
                            .flat_map(|r| r.lines)
                            .map(|l| l.text)
                            .collect()
                    })
                    .unwrap_or_default();
                JobState::Succeeded(lines)
            }
            "failed" => JobState::Failed,
            other => JobState::Other(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn parse_state(json: &str) -> JobState {
        let envelope: ReadEnvelope = serde_json::from_str(json).unwrap();
        envelope.into_state()
    }

    #[test]
    fn test_envelope_pending_states() {
        assert_eq!(parse_state(r#"{"status":"notStarted"}"#), JobState::NotStarted);
        assert_eq!(parse_state(r#"{"status":"running"}"#), JobState::Running);
        assert!(parse_state(r#"{"status":"running"}"#).is_pending());
    }

    #[test]
    fn test_envelope_succeeded_collects_lines_in_order() {
        let json = r#"{
            "status": "succeeded",
            "analyzeResult": {
                "readResults": [
                    {"lines": [{"text": "first"}, {"text": "second"}]},
                    {"lines": [{"text": "third"}]}
                ]
            }
        }"#;
        assert_eq!(
            parse_state(json),
            JobState::Succeeded(vec![
                "first".to_string(),
                "second".to_string(),
                "third".to_string()
            ])
        );
    }

    #[test]
    fn test_envelope_succeeded_without_result_block() {
        assert_eq!(
            parse_state(r#"{"status":"succeeded"}"#),
            JobState::Succeeded(vec![])
        );
    }

    #[test]
    fn test_envelope_terminal_states() {
        assert_eq!(parse_state(r#"{"status":"failed"}"#), JobState::Failed);
        assert_eq!(
            parse_state(r#"{"status":"canceled"}"#),
            JobState::Other("canceled".to_string())
        );
        assert!(!JobState::Failed.is_pending());
    }

    /// Service that reports pending a fixed number of times, then a
    /// terminal state.
    struct ScriptedService {
        pending_polls: RefCell<u32>,
        terminal: JobState,
    }

    impl OcrService for ScriptedService {
        fn submit(&self, _png: &[u8]) -> Result<OcrJob> {
            Ok(OcrJob {
                operation_url: "mock://job/1".to_string(),
            })
        }

        fn poll(&self, _job: &OcrJob) -> Result<JobState> {
            let mut remaining = self.pending_polls.borrow_mut();
            if *remaining > 0 {
                *remaining -= 1;
                Ok(JobState::Running)
            } else {
                Ok(self.terminal.clone())
            }
        }
    }

    #[test]
    fn test_poll_to_completion_waits_out_pending() {
        let service = ScriptedService {
            pending_polls: RefCell::new(3),
            terminal: JobState::Succeeded(vec!["done".to_string()]),
        };
        let job = service.submit(b"png").unwrap();
        let policy = PollPolicy {
            interval: Duration::from_millis(1),
            max_attempts: None,
        };
        let state = poll_to_completion(&service, &job, &policy).unwrap();
        assert_eq!(state, JobState::Succeeded(vec!["done".to_string()]));
    }

    #[test]
    fn test_poll_to_completion_bounded_budget() {
        let service = ScriptedService {
            pending_polls: RefCell::new(10),
            terminal: JobState::Failed,
        };
        let job = service.submit(b"png").unwrap();
        let policy = PollPolicy::bounded(Duration::from_millis(1), 3);
        let err = poll_to_completion(&service, &job, &policy).unwrap_err();
        assert!(matches!(err, ExtractError::Timeout));
    }

    #[test]
    fn test_default_policy_is_unbounded() {
        let policy = PollPolicy::default();
        assert_eq!(policy.interval, DEFAULT_POLL_INTERVAL);
        assert!(policy.max_attempts.is_none());
    }
}
