//! Detection service response handling.
//!
//! The service has shipped two incompatible "done" bodies over time: a
//! legacy single numeric score and a newer per-tool score map. Both are
//! resolved into one tagged union here, at the boundary, so the rest of the
//! client never probes response fields.

use crate::model::{DetectionResult, TextStats};
use serde_json::Value;
use std::collections::BTreeMap;

/// What one poll response means.
#[derive(Debug, Clone, PartialEq)]
pub enum PollReply {
    /// Analysis finished with scores.
    Done(RemoteScores),
    /// The service reported its own failure; terminal.
    Failed(String),
    /// Anything unrecognized: the task is still running.
    NotReady,
}

/// The two score dialects the service can return.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteScores {
    /// Per-tool score map plus an overall score.
    Detailed {
        /// Numeric score per detection tool, 0-100.
        tool_scores: BTreeMap<String, f64>,
        /// Overall score; used only when no tool score is numeric.
        overall: f64,
    },
    /// Single numeric score.
    Legacy {
        /// AI probability, 0-100.
        score: f64,
    },
}

/// Classify one poll response body.
///
/// This is the single dispatch point over both response schemas. Shapes are
/// tried from most to least specific; anything that matches neither a done
/// shape nor the explicit error shape is "not ready yet".
pub fn classify_reply(body: &Value) -> PollReply {
    // Detailed shape: {"success": true, "detection_scores": {...}, "overall_score": n}
    if body.get("success").and_then(Value::as_bool) == Some(true) {
        if let Some(scores) = body.get("detection_scores").and_then(Value::as_object) {
            let tool_scores: BTreeMap<String, f64> = scores
                .iter()
                .filter_map(|(name, v)| v.as_f64().map(|score| (name.clone(), score)))
                .collect();
            let overall = body
                .get("overall_score")
                .and_then(Value::as_f64)
                .unwrap_or(0.0);
            return PollReply::Done(RemoteScores::Detailed {
                tool_scores,
                overall,
            });
        }
    }

    // Explicit terminal error: {"status": "error", "message": "..."}
    if body.get("status").and_then(Value::as_str) == Some("error") {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("analysis failed")
            .to_string();
        return PollReply::Failed(message);
    }

    // Legacy shape: {"status": "done"} and/or {"result": n}
    let status_done = body.get("status").and_then(Value::as_str) == Some("done");
    if status_done || body.get("result").is_some() {
        let score = match body.get("result") {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            // Older responses carried the score as a string
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        };
        return PollReply::Done(RemoteScores::Legacy { score });
    }

    PollReply::NotReady
}

/// Normalize remote scores into a [`DetectionResult`].
///
/// Statistics come from the submitted text, never from the response.
pub fn normalize(scores: RemoteScores, submitted_text: &str) -> DetectionResult {
    let (ai_raw, tool_scores) = match scores {
        RemoteScores::Detailed {
            tool_scores,
            overall,
        } => {
            let numeric: Vec<f64> = tool_scores.values().copied().collect();
            let mean = if numeric.is_empty() {
                overall
            } else {
                numeric.iter().sum::<f64>() / numeric.len() as f64
            };
            (mean, Some(tool_scores))
        }
        RemoteScores::Legacy { score } => (score, None),
    };

    let ai_probability = ai_raw.round().clamp(0.0, 100.0) as u8;
    let human_probability = 100 - ai_probability;
    let confidence_score =
        ((100.0 - (f64::from(ai_probability) - 50.0).abs()) * 2.0).round().clamp(0.0, 100.0) as u8;

    DetectionResult {
        ai_probability,
        human_probability,
        confidence_score,
        tool_scores,
        stats: TextStats::measure(submitted_text),
    }
}
