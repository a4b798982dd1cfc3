// arbox_sim/src/scene/core/events.rs

use arbox_core::tracking::TrackingStatus;
use bevy::prelude::Event;
use serde::Deserialize;

/// A callback from the AR runtime.
///
/// All callbacks share one event type so that a found and a lost raised in
/// the same frame are applied in the order they happened.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArRuntimeEvent {
    AnchorFound,
    AnchorLost,
    TrackingStatusChanged(TrackingStatus),
    /// A raw tracking-quality code, as the runtime reports it.
    RawTrackingCode(i32),
}
