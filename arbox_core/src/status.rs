// arbox_core/src/status.rs

use std::fmt;

use crate::tracking::{AnchorState, TrackingStatus};

/// The text shown to the user. It is a projection of the most recent
/// tracking or anchor event and carries no state of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusMessage {
    #[default]
    Initializing,
    Searching,
    TrackingUnavailable,
    TargetFound,
    TargetLost,
}

impl StatusMessage {
    pub fn text(self) -> &'static str {
        match self {
            Self::Initializing => "Initializing AR...",
            Self::Searching => "Find the target image...",
            Self::TrackingUnavailable => "Tracking unavailable",
            Self::TargetFound => "Target Found!",
            Self::TargetLost => "Target Lost!",
        }
    }

    /// The message for a tracking-quality update, if that status has one.
    /// `Uninitialized` has none, so the previous message stays on screen.
    pub fn for_tracking(status: TrackingStatus) -> Option<Self> {
        match status {
            TrackingStatus::Normal => Some(Self::Searching),
            TrackingStatus::Unavailable => Some(Self::TrackingUnavailable),
            TrackingStatus::Uninitialized => None,
        }
    }

    pub fn for_anchor(state: AnchorState) -> Self {
        match state {
            AnchorState::Found => Self::TargetFound,
            AnchorState::Lost => Self::TargetLost,
        }
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}
