//! Order status stage pipeline.
//!
//! The backend emits free-text action strings with timestamps; the progress
//! display maps them onto a fixed five-stage pipeline. Progress is judged by
//! stage index only, so out-of-order event delivery can never make the
//! display regress.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The fixed display pipeline, in order.
pub const STAGE_PIPELINE: [Stage; 5] = [
    Stage::Approved,
    Stage::Preparing,
    Stage::Ready,
    Stage::Shipping,
    Stage::Delivered,
];

/// A milestone in the order progress display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Approved,
    Preparing,
    Ready,
    Shipping,
    Delivered,
}

impl Stage {
    /// Map a raw backend action string onto a stage.
    ///
    /// `None` means the action has not reached any known stage; callers treat
    /// it as "no progress yet", never as an error.
    #[must_use]
    pub fn from_raw_action(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "approved" | "accepted" | "confirmed" => Some(Stage::Approved),
            "pending" | "processing" | "preparing" | "baking" => Some(Stage::Preparing),
            "ready" | "ready for pickup" | "packaged" => Some(Stage::Ready),
            "shipping" | "shipped" | "dispatched" | "in transit" | "out for delivery" => {
                Some(Stage::Shipping)
            }
            "delivered" | "completed" => Some(Stage::Delivered),
            _ => None,
        }
    }

    /// Position in [`STAGE_PIPELINE`].
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Stage::Approved => 0,
            Stage::Preparing => 1,
            Stage::Ready => 2,
            Stage::Shipping => 3,
            Stage::Delivered => 4,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Stage::Approved => "approved",
            Stage::Preparing => "preparing",
            Stage::Ready => "ready",
            Stage::Shipping => "shipping",
            Stage::Delivered => "delivered",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One raw status event from the order timeline source.
///
/// `timestamp` is `None` when the source sent something unparseable; the
/// event keeps its place in the sequence and displays a placeholder instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub action: String,
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TimelineEvent {
    /// Display label for the event's timestamp; malformed or missing
    /// timestamps render as the "current status" placeholder.
    #[must_use]
    pub fn timestamp_label(&self) -> String {
        self.timestamp.map_or_else(
            || "current status".to_string(),
            |ts| ts.format("%Y-%m-%d %H:%M").to_string(),
        )
    }
}

/// Stage reached by the chronologically last event.
///
/// An empty sequence yields the initial [`Stage::Approved`] (the default
/// non-error state); a last event with an unrecognized action yields `None`,
/// meaning no known stage has been reached.
#[must_use]
pub fn current_stage(events: &[TimelineEvent]) -> Option<Stage> {
    match events.last() {
        None => Some(Stage::Approved),
        Some(event) => Stage::from_raw_action(&event.action),
    }
}

/// A stage is complete iff its pipeline index is at or before the current
/// stage's index. Index comparison only, so the display is monotonic.
#[must_use]
pub fn is_stage_complete(stage: Stage, current: Stage) -> bool {
    stage.index() <= current.index()
}
