//! Active speaker resolution.
//!
//! The participant shown in the large tile is, in order of preference, the
//! manually selected peer, the last remote participant that spoke, or the
//! first participant in the room. Ids that are no longer in the room are
//! never returned.

use crate::room::participant::ParticipantMap;

/// Picks the participant for the large tile.
pub fn resolve_active_peer<'a>(
    peers: &'a ParticipantMap,
    selected_peer_id: Option<&str>,
    last_speaker: Option<&str>,
) -> Option<&'a str> {
    let present = move |id: Option<&str>| id.and_then(|id| peers.get(id)).map(|p| p.id.as_str());

    present(selected_peer_id)
        .or_else(|| present(last_speaker))
        .or_else(|| peers.ids().next())
}

/// Next value of the remembered speaker given an active-speaker signal.
///
/// The local participant never becomes the remembered speaker. A remote
/// speaker is remembered even while a manual selection is shown.
pub fn remember_speaker(
    last_speaker: Option<&str>,
    active_speaker_id: Option<&str>,
    my_id: &str,
) -> Option<String> {
    match active_speaker_id {
        Some(speaker) if !speaker.is_empty() && speaker != my_id => Some(speaker.to_string()),
        _ => last_speaker.map(str::to_string),
    }
}

/// Holds the last remote participant that spoke, for the lifetime of the
/// filmstrip.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SpeakerMemory {
    last_speaker: Option<String>,
}

impl SpeakerMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&str> {
        self.last_speaker.as_deref()
    }

    /// Applies [`remember_speaker`]. Returns whether the memory changed.
    pub fn observe(&mut self, active_speaker_id: Option<&str>, my_id: &str) -> bool {
        let next = remember_speaker(self.get(), active_speaker_id, my_id);
        if next == self.last_speaker {
            return false;
        }
        log::debug!(
            "SpeakerMemory::observe: last speaker {:?} -> {:?}",
            self.last_speaker,
            next
        );
        self.last_speaker = next;
        true
    }
}
