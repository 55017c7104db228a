//! Scenario replay.
//!
//! A scenario is a JSON document listing what happens to a filmstrip:
//! mounts, room updates, resize bursts, time passing and thumbnail clicks.
//! Replay runs against a [`ManualClock`], so debounce behaviour is exact and
//! independent of wall-clock time.
//!
//! ```json
//! {
//!   "my_id": "me",
//!   "steps": [
//!     { "step": "update", "peers": [{ "id": "alice", "consumers": ["c1"] }],
//!       "consumers": [{ "id": "c1", "source": "webcam" }], "spotlights": ["alice"] },
//!     { "step": "mount", "window": { "width": 1280, "height": 900 },
//!       "container": { "width": 1000, "height": 800 } },
//!     { "step": "advance", "ms": 250 }
//!   ]
//! }
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::{ConfigError, FilmstripConfig};
use crate::layout::tiles::FilmstripView;
use crate::room::participant::{ConsumerMap, ParticipantMap};
use crate::room::room_control::RoomControl;
use crate::room::snapshot::RoomSnapshot;
use crate::utils::clock::ManualClock;
use crate::utils::geometry::Measurements;
use crate::Filmstrip;

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Failed to read scenario: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse scenario: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Distinguishes a missing field from an explicit `null`.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Changes to the room since the previous step.
///
/// Omitted fields keep their previous value. Omitted collections also keep
/// their previous identity, so a patch that names nothing is an unchanged
/// snapshot. `null` clears the optional ids.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SnapshotPatch {
    pub my_id: Option<String>,
    #[serde(deserialize_with = "double_option")]
    pub active_speaker_id: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub selected_peer_id: Option<Option<String>>,
    pub peers: Option<ParticipantMap>,
    pub consumers: Option<ConsumerMap>,
    pub spotlights: Option<Vec<String>>,
    pub advanced_mode: Option<bool>,
}

impl SnapshotPatch {
    pub fn apply(&self, base: &RoomSnapshot) -> RoomSnapshot {
        let mut next = base.clone();
        if let Some(my_id) = &self.my_id {
            next.my_id = my_id.clone();
        }
        if let Some(active_speaker_id) = &self.active_speaker_id {
            next.active_speaker_id = active_speaker_id.clone();
        }
        if let Some(selected_peer_id) = &self.selected_peer_id {
            next.selected_peer_id = selected_peer_id.clone();
        }
        if let Some(peers) = &self.peers {
            next.peers = Arc::new(peers.clone());
        }
        if let Some(consumers) = &self.consumers {
            next.consumers = Arc::new(consumers.clone());
        }
        if let Some(spotlights) = &self.spotlights {
            next.spotlights = Arc::new(spotlights.clone());
        }
        if let Some(advanced_mode) = self.advanced_mode {
            next.advanced_mode = advanced_mode;
        }
        next
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ScenarioStep {
    Mount(Measurements),
    Unmount,
    Update(SnapshotPatch),
    Resize(Measurements),
    Advance { ms: u64 },
    Select { peer_id: String },
}

impl fmt::Display for ScenarioStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioStep::Mount(m) => write!(
                f,
                "mount container={}x{}",
                m.container.width, m.container.height
            ),
            ScenarioStep::Unmount => write!(f, "unmount"),
            ScenarioStep::Update(_) => write!(f, "update"),
            ScenarioStep::Resize(m) => write!(
                f,
                "resize container={}x{}",
                m.container.width, m.container.height
            ),
            ScenarioStep::Advance { ms } => write!(f, "advance {ms}ms"),
            ScenarioStep::Select { peer_id } => write!(f, "select {peer_id}"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub my_id: String,
    #[serde(default)]
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    pub fn from_json_str(json: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        log::info!("Scenario::load: {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// Outcome of one replayed step.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub step: String,
    /// Whether the step caused the filmstrip to react: an update that was
    /// not skipped, or a resize deadline that fired.
    pub reacted: bool,
    /// Virtual time since the start of the replay.
    pub elapsed_ms: u64,
    pub recomputations: u64,
    pub view: FilmstripView,
}

/// Drives a [`Filmstrip`] through a scenario on a virtual clock.
pub struct ScenarioRunner<R: RoomControl> {
    clock: Arc<ManualClock>,
    filmstrip: Filmstrip<R>,
}

impl<R: RoomControl> ScenarioRunner<R> {
    pub fn new(config: FilmstripConfig, my_id: &str, room_control: R) -> Result<Self, ScenarioError> {
        let clock = Arc::new(ManualClock::new());
        let filmstrip = Filmstrip::new(config, RoomSnapshot::new(my_id), room_control, clock.clone())?;
        Ok(Self { clock, filmstrip })
    }

    pub fn filmstrip(&self) -> &Filmstrip<R> {
        &self.filmstrip
    }

    pub fn step(&mut self, step: &ScenarioStep) -> bool {
        match step {
            ScenarioStep::Mount(measurements) => {
                self.filmstrip.mount(*measurements);
                true
            }
            ScenarioStep::Unmount => {
                self.filmstrip.unmount();
                true
            }
            ScenarioStep::Update(patch) => {
                let next = patch.apply(self.filmstrip.snapshot());
                self.filmstrip.update(next)
            }
            ScenarioStep::Resize(measurements) => {
                self.filmstrip.on_resize(*measurements);
                false
            }
            ScenarioStep::Advance { ms } => {
                self.clock.advance(Duration::from_millis(*ms));
                self.filmstrip.poll()
            }
            ScenarioStep::Select { peer_id } => {
                self.filmstrip.select_peer(peer_id);
                false
            }
        }
    }

    pub fn run(&mut self, scenario: &Scenario) -> Vec<StepReport> {
        scenario
            .steps
            .iter()
            .enumerate()
            .map(|(index, step)| {
                let reacted = self.step(step);
                log::debug!("ScenarioRunner::run: step {index} {step} reacted={reacted}");
                StepReport {
                    index,
                    step: step.to_string(),
                    reacted,
                    elapsed_ms: self.clock.elapsed().as_millis() as u64,
                    recomputations: self.filmstrip.recomputations(),
                    view: self.filmstrip.view(),
                }
            })
            .collect()
    }
}
