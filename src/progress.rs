//! Progress reporting for long-running extraction and detection work.
//!
//! Both pipelines emit an ordered sequence of [`ProgressEvent`]s through a
//! caller-supplied [`ProgressObserver`]. Events are fire-and-forget: nothing
//! is read back from the observer, and consumers must tolerate receiving any
//! subset of the documented steps (there is no fixed count guarantee).

use serde::{Deserialize, Serialize};

/// Pipeline stage an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStep {
    /// Reading file bytes.
    Reading,
    /// Parsing the PDF document structure.
    Parsing,
    /// Per-page text extraction (repeated, carries a percentage).
    Extracting,
    /// Normalizing the combined text.
    Cleaning,
    /// Work finished.
    Completed,
    /// Submitting text to the detection service.
    Submitting,
    /// Waiting for the detection service result.
    Processing,
    /// About to process one chunk of a chunked detection run.
    Part,
}

impl ProgressStep {
    /// Stable string name of the step.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressStep::Reading => "reading",
            ProgressStep::Parsing => "parsing",
            ProgressStep::Extracting => "extracting",
            ProgressStep::Cleaning => "cleaning",
            ProgressStep::Completed => "completed",
            ProgressStep::Submitting => "submitting",
            ProgressStep::Processing => "processing",
            ProgressStep::Part => "part",
        }
    }
}

/// A single progress notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Stage of the pipeline.
    pub step: ProgressStep,
    /// Human-readable description.
    pub message: String,
    /// Completion percentage, when the stage has a meaningful one.
    pub percent: Option<u8>,
}

impl ProgressEvent {
    /// Create an event without a percentage.
    pub fn new(step: ProgressStep, message: impl Into<String>) -> Self {
        Self {
            step,
            message: message.into(),
            percent: None,
        }
    }

    /// Create an event carrying a completion percentage.
    pub fn with_percent(step: ProgressStep, message: impl Into<String>, percent: u8) -> Self {
        Self {
            step,
            message: message.into(),
            percent: Some(percent),
        }
    }
}

/// Receiver for progress events.
///
/// Use [`ProgressFn`] to adapt a closure, or [`NoProgress`] to discard
/// events.
pub trait ProgressObserver {
    /// Called once per event, in emission order.
    fn on_progress(&mut self, event: ProgressEvent);
}

/// Adapter turning any `FnMut(ProgressEvent)` closure into an observer.
pub struct ProgressFn<F>(pub F);

impl<F: FnMut(ProgressEvent)> ProgressObserver for ProgressFn<F> {
    fn on_progress(&mut self, event: ProgressEvent) {
        (self.0)(event)
    }
}

/// Observer that discards all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&mut self, _event: ProgressEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_names() {
        assert_eq!(ProgressStep::Extracting.as_str(), "extracting");
        assert_eq!(ProgressStep::Part.as_str(), "part");
    }

    #[test]
    fn test_closure_observer_collects_in_order() {
        let mut seen = Vec::new();
        {
            let mut obs = ProgressFn(|event: ProgressEvent| seen.push(event.step));
            obs.on_progress(ProgressEvent::new(ProgressStep::Reading, "r"));
            obs.on_progress(ProgressEvent::with_percent(ProgressStep::Extracting, "e", 50));
            obs.on_progress(ProgressEvent::new(ProgressStep::Completed, "c"));
        }
        assert_eq!(
            seen,
            vec![
                ProgressStep::Reading,
                ProgressStep::Extracting,
                ProgressStep::Completed
            ]
        );
    }
}
