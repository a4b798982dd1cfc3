// arbox_core/src/spawner.rs

//! The tracking-driven spawner: a small state machine that turns anchor and
//! tracking callbacks into an ordered list of boxes to render.

use nalgebra::Vector3;
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::descriptors::{BoxDescriptor, SceneFrame, SceneLayout};
use crate::error::ConfigError;
use crate::scheduler::{IntervalScheduler, TimerHandle};
use crate::status::StatusMessage;
use crate::tracking::{AnchorState, TrackingStatus};

// =========================================================================
// == Configuration ==
// =========================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SpawnerConfig {
    /// Time between two spawns while the anchor is found.
    pub interval_ms: u64,
    /// Height above the anchor plane at which boxes appear, in meters.
    pub spawn_height: f32,
    /// Boxes appear at x, z drawn uniformly from `[-extent, extent]`.
    pub horizontal_extent: f32,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2000,
            spawn_height: 0.5,
            horizontal_extent: 0.2,
        }
    }
}

impl SpawnerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if !self.spawn_height.is_finite() {
            return Err(ConfigError::InvalidHeight(self.spawn_height));
        }
        if !self.horizontal_extent.is_finite() || self.horizontal_extent < 0.0 {
            return Err(ConfigError::InvalidExtent(self.horizontal_extent));
        }
        Ok(())
    }
}

// =========================================================================
// == Spawned Entities ==
// =========================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct SpawnedEntity {
    pub id: u64,
    /// Position relative to the anchor, in meters.
    pub position: Vector3<f32>,
}

// =========================================================================
// == Spawner ==
// =========================================================================

/// Owns the anchor flag, the spawned entities and the single spawn loop.
///
/// Invariants:
/// - `entities` is empty whenever the anchor is lost.
/// - at most one spawn loop is scheduled at any time.
/// - ids come from a counter that only grows, across every found/lost cycle.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "bevy", derive(bevy_ecs::prelude::Resource))]
pub struct TrackingSpawner {
    config: SpawnerConfig,
    jitter: Uniform<f32>,
    scheduler: IntervalScheduler,
    spawn_loop: Option<TimerHandle>,
    anchor: AnchorState,
    tracking: TrackingStatus,
    status: StatusMessage,
    entities: Vec<SpawnedEntity>,
    next_id: u64,
}

impl TrackingSpawner {
    pub fn new(config: SpawnerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let extent = config.horizontal_extent;

        Ok(Self {
            jitter: Uniform::new_inclusive(-extent, extent),
            config,
            scheduler: IntervalScheduler::new(),
            spawn_loop: None,
            anchor: AnchorState::Lost,
            tracking: TrackingStatus::Uninitialized,
            status: StatusMessage::Initializing,
            entities: Vec::new(),
            next_id: 0,
        })
    }

    // --- Inbound callbacks ---

    /// Records a new tracking quality. Only the status message can change;
    /// statuses without a message of their own leave it as it was.
    pub fn on_tracking_update(&mut self, status: TrackingStatus) {
        self.tracking = status;
        if let Some(message) = StatusMessage::for_tracking(status) {
            self.status = message;
        }
    }

    /// Same as [`Self::on_tracking_update`] for a raw runtime code. Unknown
    /// codes are ignored. Returns whether the code was recognized.
    pub fn on_tracking_code(&mut self, code: i32) -> bool {
        match TrackingStatus::from_code(code) {
            Ok(status) => {
                self.on_tracking_update(status);
                true
            }
            Err(_) => false,
        }
    }

    /// Marks the anchor as found and starts the spawn loop. If the loop is
    /// already running it is left untouched. Returns whether a new loop was
    /// started.
    pub fn on_anchor_found(&mut self) -> bool {
        self.anchor = AnchorState::Found;
        self.status = StatusMessage::for_anchor(AnchorState::Found);

        if self.spawn_loop.is_some() {
            return false;
        }

        // `interval()` is non-zero once the config has been validated.
        match self.scheduler.start_interval(self.config.interval()) {
            Ok(handle) => {
                self.spawn_loop = Some(handle);
                true
            }
            Err(_) => false,
        }
    }

    /// Marks the anchor as lost. The spawn loop is cancelled before the
    /// entities are cleared. The id counter is kept. Returns how many
    /// entities were removed.
    pub fn on_anchor_lost(&mut self) -> usize {
        self.anchor = AnchorState::Lost;
        self.status = StatusMessage::for_anchor(AnchorState::Lost);
        self.stop_spawn_loop();

        let cleared = self.entities.len();
        self.entities.clear();
        cleared
    }

    // --- Time ---

    /// Moves the spawner's clock forward by `dt`, appending one entity per
    /// elapsed interval. Returns the entities spawned during this call.
    pub fn advance<R: Rng + ?Sized>(&mut self, dt: Duration, rng: &mut R) -> &[SpawnedEntity] {
        let first_new = self.entities.len();

        for handle in self.scheduler.advance(dt) {
            if Some(handle) != self.spawn_loop || !self.anchor.is_found() {
                continue;
            }
            let entity = SpawnedEntity {
                id: self.next_id,
                position: Vector3::new(
                    self.jitter.sample(rng),
                    self.config.spawn_height,
                    self.jitter.sample(rng),
                ),
            };
            self.next_id += 1;
            self.entities.push(entity);
        }

        &self.entities[first_new..]
    }

    /// Tears the spawner down when the scene goes away. Any pending loop is
    /// cancelled and the entities are dropped. The status message is kept.
    pub fn shutdown(&mut self) {
        self.stop_spawn_loop();
        self.anchor = AnchorState::Lost;
        self.entities.clear();
    }

    fn stop_spawn_loop(&mut self) {
        if let Some(handle) = self.spawn_loop.take() {
            self.scheduler.cancel(handle);
        }
    }

    // --- Read-only projection ---

    pub fn config(&self) -> &SpawnerConfig {
        &self.config
    }

    pub fn anchor_state(&self) -> AnchorState {
        self.anchor
    }

    pub fn is_anchored(&self) -> bool {
        self.anchor.is_found()
    }

    pub fn tracking_status(&self) -> TrackingStatus {
        self.tracking
    }

    pub fn status(&self) -> StatusMessage {
        self.status
    }

    pub fn entities(&self) -> &[SpawnedEntity] {
        &self.entities
    }

    /// The id the next spawned entity will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Number of spawn loops currently scheduled. Never more than one.
    pub fn active_timers(&self) -> usize {
        self.scheduler.active_count()
    }

    /// Virtual time the spawner has been advanced by so far.
    pub fn elapsed(&self) -> Duration {
        self.scheduler.now()
    }

    /// Builds the declarative scene for the renderer. The floor is only
    /// present while the anchor is found.
    pub fn frame(&self, layout: &SceneLayout) -> SceneFrame {
        SceneFrame {
            status: self.status,
            floor: self.is_anchored().then(|| layout.floor.clone()),
            boxes: self
                .entities
                .iter()
                .map(|entity| BoxDescriptor::from_entity(entity, &layout.boxes))
                .collect(),
        }
    }
}
