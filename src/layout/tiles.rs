//! Render plan for the filmstrip and the tile rendering capability.
//!
//! The filmstrip does not draw. It produces a [`FilmstripView`] describing
//! which tiles exist and how big they are, and hands each tile to a
//! [`TileRenderer`] supplied by the host.

use serde::Serialize;
use std::fmt::Write as _;

use crate::layout::dimensions::Dimensions;

/// Thumbnail size in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct ThumbnailSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeakerTile {
    pub id: String,
    pub dimensions: Dimensions,
    pub advanced_mode: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeTile {
    pub id: String,
    pub size: Option<ThumbnailSize>,
    /// The local participant is also the one in the large tile.
    pub active: bool,
    pub advanced_mode: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeerTile {
    pub id: String,
    pub size: Option<ThumbnailSize>,
    /// Manually selected through the room.
    pub selected: bool,
    /// Shown in the large tile.
    pub active: bool,
    pub advanced_mode: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HiddenPeersBadge {
    pub count: usize,
}

/// Everything the host needs to draw one frame of the filmstrip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilmstripView {
    pub active_peer_id: Option<String>,
    pub speaker: Option<SpeakerTile>,
    pub me: MeTile,
    pub thumbnails: Vec<PeerTile>,
    pub hidden_peers: Option<HiddenPeersBadge>,
}

/// Draws tiles. One method per tile variant.
pub trait TileRenderer {
    fn render_speaker(&mut self, tile: &SpeakerTile);
    fn render_me(&mut self, tile: &MeTile);
    fn render_peer(&mut self, tile: &PeerTile);
    fn render_hidden_peers(&mut self, badge: &HiddenPeersBadge);
}

impl FilmstripView {
    /// Walks the plan in paint order: speaker, local tile, strip, badge.
    pub fn render<R: TileRenderer + ?Sized>(&self, renderer: &mut R) {
        if let Some(speaker) = &self.speaker {
            renderer.render_speaker(speaker);
        }
        renderer.render_me(&self.me);
        for peer in &self.thumbnails {
            renderer.render_peer(peer);
        }
        if let Some(badge) = &self.hidden_peers {
            renderer.render_hidden_peers(badge);
        }
    }
}

/// Renders tiles as one line of text each.
#[derive(Debug, Default)]
pub struct TextRenderer {
    output: String,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> String {
        self.output
    }
}

fn flags(pairs: &[(&str, bool)]) -> String {
    let set: Vec<&str> = pairs
        .iter()
        .filter(|(_, on)| *on)
        .map(|(name, _)| *name)
        .collect();
    if set.is_empty() {
        String::new()
    } else {
        format!(" [{}]", set.join(","))
    }
}

fn size_label(size: Option<ThumbnailSize>) -> String {
    match size {
        Some(size) => format!("{:.1}x{:.1}", size.width, size.height),
        None => "-".to_string(),
    }
}

impl TileRenderer for TextRenderer {
    fn render_speaker(&mut self, tile: &SpeakerTile) {
        let _ = writeln!(
            self.output,
            "speaker {} {:.2}x{:.2}",
            tile.id, tile.dimensions.width, tile.dimensions.height
        );
    }

    fn render_me(&mut self, tile: &MeTile) {
        let _ = writeln!(
            self.output,
            "me {} {}{}",
            tile.id,
            size_label(tile.size),
            flags(&[("active", tile.active)])
        );
    }

    fn render_peer(&mut self, tile: &PeerTile) {
        let _ = writeln!(
            self.output,
            "peer {} {}{}",
            tile.id,
            size_label(tile.size),
            flags(&[("selected", tile.selected), ("active", tile.active)])
        );
    }

    fn render_hidden_peers(&mut self, badge: &HiddenPeersBadge) {
        let _ = writeln!(self.output, "hidden +{}", badge.count);
    }
}
