//! Detection service client.
//!
//! One submission moves through `Created -> Submitted -> Polling ->
//! {Done | Failed}`. Terminal states are final: there are no retries after
//! failure and no resubmission of a task.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_BASE_URL, MAX_POLL_ATTEMPTS, POLL_INTERVAL_MS, REQUEST_TIMEOUT_SECS};
use crate::error::{Error, Result};
use crate::model::{DetectionResult, DetectionTask, TaskStatus};
use crate::progress::{ProgressEvent, ProgressObserver, ProgressStep};
use crate::sanitize::TextSanitizer;

use super::response::{classify_reply, normalize, PollReply};

/// Detection client configuration.
///
/// The service endpoint is injected here, resolved once at construction;
/// nothing inside the client hardcodes network locations.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Base URL of the detection service.
    pub base_url: String,

    /// Maximum poll attempts per task.
    pub max_attempts: u32,

    /// Sleep between poll attempts.
    pub poll_interval: Duration,

    /// Per-request timeout for submit and poll calls.
    pub request_timeout: Duration,
}

impl DetectorConfig {
    /// Create a config for the given service base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the maximum poll attempts.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Set the delay between poll attempts.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_attempts: MAX_POLL_ATTEMPTS,
            poll_interval: Duration::from_millis(POLL_INTERVAL_MS),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }
}

#[derive(Serialize)]
struct SubmitRequest<'a> {
    content: &'a str,
}

#[derive(Deserialize)]
struct SubmitReply {
    id: Option<String>,
}

#[derive(Serialize)]
struct ResultRequest<'a> {
    id: &'a str,
}

/// Client for the remote AI-authorship scorer.
pub struct DetectionClient {
    http: reqwest::Client,
    config: DetectorConfig,
    sanitizer: TextSanitizer,
}

impl DetectionClient {
    /// Create a client with the default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(DetectorConfig::default())
    }

    /// Create a client with a custom configuration.
    pub fn with_config(config: DetectorConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            config,
            sanitizer: TextSanitizer::new(),
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Submit text for analysis. Single attempt, no retry.
    ///
    /// The text is passed through as given; use
    /// [`TextSanitizer::validate_for_analysis`] (or [`Self::detect`]) for
    /// normalization and length checks.
    pub async fn submit(&self, text: &str) -> Result<DetectionTask> {
        let response = self
            .http
            .post(self.config.endpoint("api/v1/getId"))
            .json(&SubmitRequest { content: text })
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimited);
        }
        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(Error::Forbidden);
        }
        if !status.is_success() {
            return Err(Error::SubmitRejected(format!(
                "service answered HTTP {status}"
            )));
        }

        let reply: SubmitReply = response
            .json()
            .await
            .map_err(|e| Error::SubmitRejected(format!("unreadable response: {e}")))?;
        let task_id = reply
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::SubmitRejected("response carried no task id".to_string()))?;

        log::debug!("submitted detection task {task_id}");
        Ok(DetectionTask {
            task_id,
            submitted_text: text.to_string(),
            status: TaskStatus::Pending,
        })
    }

    /// Poll a task until it completes or the attempt limit runs out.
    ///
    /// Each attempt is one request; unrecognized bodies and transient
    /// request failures both count as "not ready" and are retried after the
    /// poll interval. A task-not-found response is terminal immediately.
    /// Exhausting all attempts fails with [`Error::PollTimeout`].
    pub async fn poll(&self, task: &DetectionTask) -> Result<DetectionResult> {
        for attempt in 1..=self.config.max_attempts {
            match self.query_result(&task.task_id).await {
                Ok(PollReply::Done(scores)) => {
                    return Ok(normalize(scores, &task.submitted_text));
                }
                Ok(PollReply::Failed(message)) => {
                    return Err(Error::RemoteAnalysis(message));
                }
                Ok(PollReply::NotReady) => {
                    log::debug!("task {} not ready (attempt {attempt})", task.task_id);
                }
                Err(Error::TaskNotFound) => return Err(Error::TaskNotFound),
                Err(err) => {
                    log::warn!(
                        "poll attempt {attempt} for task {} failed: {err}",
                        task.task_id
                    );
                }
            }

            if attempt < self.config.max_attempts {
                tokio::time::sleep(self.config.poll_interval).await;
            }
        }

        Err(Error::PollTimeout)
    }

    async fn query_result(&self, task_id: &str) -> Result<PollReply> {
        let response = self
            .http
            .post(self.config.endpoint("api/v1/result"))
            .json(&ResultRequest { id: task_id })
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::TaskNotFound);
        }
        if !response.status().is_success() {
            log::warn!(
                "result endpoint answered HTTP {} for task {task_id}",
                response.status()
            );
            return Ok(PollReply::NotReady);
        }

        match response.json::<serde_json::Value>().await {
            Ok(body) => Ok(classify_reply(&body)),
            // An unreadable body is just another not-done-yet shape
            Err(_) => Ok(PollReply::NotReady),
        }
    }

    /// Validate, submit, and poll one piece of text to a final result.
    pub async fn detect(
        &self,
        text: &str,
        observer: &mut dyn ProgressObserver,
    ) -> Result<DetectionResult> {
        let text = self.sanitizer.validate_for_analysis(text)?;

        observer.on_progress(ProgressEvent::new(
            ProgressStep::Submitting,
            "Submitting text for analysis",
        ));
        let task = self.submit(&text).await?;

        observer.on_progress(ProgressEvent::new(
            ProgressStep::Processing,
            "Waiting for analysis result",
        ));
        let result = self.poll(&task).await?;

        observer.on_progress(ProgressEvent::new(
            ProgressStep::Completed,
            format!(
                "AI: {}%, Human: {}%",
                result.ai_probability, result.human_probability
            ),
        ));
        Ok(result)
    }
}
