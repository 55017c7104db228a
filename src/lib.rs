pub mod room {
    pub mod participant;
    pub mod room_control;
    pub mod snapshot;
}

pub mod layout {
    pub mod dimensions;
    pub mod spotlight;
    pub mod tiles;
}

pub mod utils {
    pub mod clock;
    pub mod debounce;
    pub mod geometry;
}

pub mod config;
pub mod scenario;
pub mod speaker;

use std::sync::Arc;
use std::time::Instant;

use config::{ConfigError, FilmstripConfig};
use layout::dimensions::{compute_dimensions, Dimensions};
use layout::spotlight::partition_spotlights;
use layout::tiles::{FilmstripView, HiddenPeersBadge, MeTile, PeerTile, SpeakerTile, ThumbnailSize};
use room::participant::is_dual_stream;
use room::room_control::RoomControl;
use room::snapshot::{snapshots_equal, RoomSnapshot};
use speaker::{resolve_active_peer, SpeakerMemory};
use utils::clock::Clock;
use utils::debounce::Debouncer;
use utils::geometry::{Extent, Measurements};

/// Active speaker tile plus a strip of participant thumbnails.
///
/// The filmstrip is driven by its host's event loop and never blocks:
///
/// - [`Filmstrip::update`] feeds a new room snapshot. Snapshots that are
///   equal to the previous one (see [`snapshots_equal`]) are dropped before
///   any work is done.
/// - [`Filmstrip::on_resize`] records new measurements and arms the resize
///   debouncer. The host calls [`Filmstrip::poll`] when
///   [`Filmstrip::next_deadline`] has passed; only the last resize of a burst
///   recomputes the speaker tile.
/// - Hosts on wall-clock time can await [`Filmstrip::settle`] instead.
/// - [`Filmstrip::view`] builds the render plan from the current state.
///
/// # State
///
/// * `last_speaker` - the last remote participant that spoke, kept for the
///   lifetime of the filmstrip
/// * `container` - the speaker container measurements, `None` while unmounted
/// * `dimensions` - the speaker tile size, held between recomputations
/// * `resize` - the one pending resize deadline, cancelled on unmount and drop
pub struct Filmstrip<R: RoomControl> {
    config: FilmstripConfig,
    room_control: R,
    snapshot: RoomSnapshot,
    last_speaker: SpeakerMemory,
    window: Option<Extent>,
    container: Option<Extent>,
    dimensions: Option<Dimensions>,
    resize: Debouncer,
    recomputations: u64,
}

impl<R: RoomControl> Filmstrip<R> {
    /// Creates an unmounted filmstrip for the initial room state.
    ///
    /// The config is validated first. The active speaker of the initial
    /// snapshot is not remembered, only speaker changes delivered through
    /// [`Filmstrip::update`] are.
    pub fn new(
        config: FilmstripConfig,
        snapshot: RoomSnapshot,
        room_control: R,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        log::info!(
            "Filmstrip::new: my_id={} peers={} debounce={:?}",
            snapshot.my_id,
            snapshot.peers.len(),
            config.resize_debounce()
        );
        let resize = Debouncer::new(config.resize_debounce(), clock);
        Ok(Self {
            config,
            room_control,
            snapshot,
            last_speaker: SpeakerMemory::new(),
            window: None,
            container: None,
            dimensions: None,
            resize,
            recomputations: 0,
        })
    }

    /// Attaches the speaker container and runs the first layout.
    pub fn mount(&mut self, measurements: Measurements) {
        log::info!("Filmstrip::mount: {measurements:?}");
        self.window = Some(measurements.window);
        self.container = Some(measurements.container);
        self.update_dimensions();
    }

    /// Detaches the container and cancels a pending resize.
    pub fn unmount(&mut self) {
        log::info!("Filmstrip::unmount");
        self.container = None;
        if self.resize.cancel() {
            log::debug!("Filmstrip::unmount: cancelled pending resize");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.container.is_some()
    }

    /// Applies a new room snapshot.
    ///
    /// Returns `false` when the snapshot is not meaningfully different from
    /// the current one and was ignored. The advanced-mode flag is taken
    /// over either way.
    pub fn update(&mut self, next: RoomSnapshot) -> bool {
        if snapshots_equal(&self.snapshot, &next) {
            log::debug!("Filmstrip::update: snapshot unchanged, skipping");
            self.snapshot.advanced_mode = next.advanced_mode;
            return false;
        }

        self.last_speaker
            .observe(next.active_speaker_id.as_deref(), &next.my_id);
        self.snapshot = next;
        self.update_dimensions();
        true
    }

    /// Records new measurements and (re)starts the resize debounce.
    ///
    /// Thumbnails follow the window immediately, the speaker tile waits for
    /// the burst to settle. Ignored while unmounted.
    pub fn on_resize(&mut self, measurements: Measurements) {
        if !self.is_mounted() {
            log::debug!("Filmstrip::on_resize: not mounted, ignoring");
            return;
        }
        log::trace!("Filmstrip::on_resize: {measurements:?}");
        self.window = Some(measurements.window);
        self.container = Some(measurements.container);
        self.resize.schedule();
    }

    /// Runs the debounced recomputation if its deadline has passed.
    ///
    /// Returns whether the speaker tile was recomputed.
    pub fn poll(&mut self) -> bool {
        if !self.resize.poll() {
            return false;
        }
        log::debug!("Filmstrip::poll: resize settled");
        self.update_dimensions()
    }

    /// When [`Filmstrip::poll`] should run next.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.resize.next_deadline()
    }

    /// Sleeps until the pending resize deadline and applies it.
    ///
    /// Meant for hosts running on [`utils::clock::SystemClock`]. Returns
    /// `false` right away when nothing is pending.
    pub async fn settle(&mut self) -> bool {
        while let Some(deadline) = self.next_deadline() {
            tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
            if self.poll() {
                return true;
            }
        }
        false
    }

    pub fn has_pending_resize(&self) -> bool {
        self.resize.is_pending()
    }

    /// Participant shown in the large tile.
    pub fn active_peer_id(&self) -> Option<&str> {
        resolve_active_peer(
            &self.snapshot.peers,
            self.snapshot.selected_peer_id.as_deref(),
            self.last_speaker.get(),
        )
    }

    pub fn last_speaker(&self) -> Option<&str> {
        self.last_speaker.get()
    }

    pub fn dimensions(&self) -> Option<Dimensions> {
        self.dimensions
    }

    /// Number of times the speaker tile has been sized.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    pub fn snapshot(&self) -> &RoomSnapshot {
        &self.snapshot
    }

    pub fn config(&self) -> &FilmstripConfig {
        &self.config
    }

    /// Thumbnail click: asks the room to select `peer_id`.
    pub fn select_peer(&self, peer_id: &str) {
        log::info!("Filmstrip::select_peer: {peer_id}");
        self.room_control.set_selected_peer(peer_id);
    }

    fn is_active_dual_stream(&self) -> bool {
        self.active_peer_id().is_some_and(|id| {
            is_dual_stream(id, &self.snapshot.peers, &self.snapshot.consumers)
        })
    }

    fn update_dimensions(&mut self) -> bool {
        let Some(container) = self.container else {
            log::debug!("Filmstrip::update_dimensions: container not mounted");
            return false;
        };

        let dual_stream = self.is_active_dual_stream();
        let dimensions = compute_dimensions(container, dual_stream, &self.config.layout);
        log::debug!(
            "Filmstrip::update_dimensions: container={container:?} dual_stream={dual_stream} -> {dimensions:?}"
        );
        self.dimensions = Some(dimensions);
        self.recomputations += 1;
        true
    }

    fn thumbnail_size(&self) -> Option<ThumbnailSize> {
        let vmin = self.window?.vmin();
        Some(ThumbnailSize {
            width: vmin * self.config.thumbnail.width_vmin,
            height: vmin * self.config.thumbnail.height_vmin,
        })
    }

    /// Builds the render plan for the current state.
    pub fn view(&self) -> FilmstripView {
        let snapshot = &self.snapshot;
        let active_peer_id = self.active_peer_id();
        let advanced_mode = snapshot.advanced_mode;
        let size = self.thumbnail_size();

        let speaker = match (active_peer_id, self.dimensions) {
            (Some(id), Some(dimensions)) => Some(SpeakerTile {
                id: id.to_string(),
                dimensions,
                advanced_mode,
            }),
            _ => None,
        };

        let me = MeTile {
            id: snapshot.my_id.clone(),
            size,
            active: active_peer_id == Some(snapshot.my_id.as_str()),
            advanced_mode,
        };

        let partition = partition_spotlights(&snapshot.spotlights, &snapshot.peers);
        let thumbnails = partition
            .shown
            .iter()
            .map(|&id| PeerTile {
                id: id.to_string(),
                size,
                selected: snapshot.selected_peer_id.as_deref() == Some(id),
                active: active_peer_id == Some(id),
                advanced_mode,
            })
            .collect();

        let hidden_peers = partition.has_hidden_badge().then(|| HiddenPeersBadge {
            count: partition.hidden_count,
        });

        FilmstripView {
            active_peer_id: active_peer_id.map(str::to_string),
            speaker,
            me,
            thumbnails,
            hidden_peers,
        }
    }
}
