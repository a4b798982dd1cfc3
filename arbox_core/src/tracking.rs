// arbox_core/src/tracking.rs

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TrackingError;

/// Pose-tracking quality as reported by the AR runtime.
///
/// This is independent of whether the marker is visible: the device can be
/// tracking normally while the target image is nowhere in view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingStatus {
    #[default]
    Uninitialized,
    Normal,
    Unavailable,
}

impl TrackingStatus {
    /// Maps the runtime's integer tracking code onto a status.
    ///
    /// The runtime uses `1` for unavailable, `2` for limited and `3` for normal.
    /// `0` is reported before the session has produced a pose. Limited quality
    /// has no status of its own and is treated as unrecognized.
    pub fn from_code(code: i32) -> Result<Self, TrackingError> {
        match code {
            0 => Ok(Self::Uninitialized),
            1 => Ok(Self::Unavailable),
            3 => Ok(Self::Normal),
            other => Err(TrackingError::UnknownCode(other)),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Self::Uninitialized => 0,
            Self::Unavailable => 1,
            Self::Normal => 3,
        }
    }
}

impl TryFrom<i32> for TrackingStatus {
    type Error = TrackingError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Uninitialized => "uninitialized",
            Self::Normal => "normal",
            Self::Unavailable => "unavailable",
        };
        f.write_str(s)
    }
}

/// Whether the marker image is currently anchored in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorState {
    Found,
    #[default]
    Lost,
}

impl AnchorState {
    pub fn is_found(self) -> bool {
        matches!(self, Self::Found)
    }
}

impl From<bool> for AnchorState {
    fn from(found: bool) -> Self {
        if found {
            Self::Found
        } else {
            Self::Lost
        }
    }
}
