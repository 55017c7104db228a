use std::sync::Arc;

use crate::room::participant::{ConsumerMap, ParticipantMap};

/// The slice of room state the filmstrip reads on every update.
///
/// Collections sit behind `Arc`s handed out by the store. A store that
/// leaves a collection untouched hands back the same `Arc`, which is what
/// [`snapshots_equal`] keys on.
#[derive(Debug, Clone)]
pub struct RoomSnapshot {
    pub my_id: String,
    pub active_speaker_id: Option<String>,
    pub selected_peer_id: Option<String>,
    pub peers: Arc<ParticipantMap>,
    pub consumers: Arc<ConsumerMap>,
    pub spotlights: Arc<Vec<String>>,
    /// Passed through to the tiles untouched.
    pub advanced_mode: bool,
}

impl RoomSnapshot {
    pub fn new(my_id: &str) -> Self {
        Self {
            my_id: my_id.to_string(),
            active_speaker_id: None,
            selected_peer_id: None,
            peers: Arc::new(ParticipantMap::new()),
            consumers: Arc::new(ConsumerMap::new()),
            spotlights: Arc::new(Vec::new()),
            advanced_mode: false,
        }
    }
}

/// Whether `next` is not worth reacting to.
///
/// Scalars compare by value, collections by identity. `advanced_mode` is
/// not part of the comparison.
pub fn snapshots_equal(prev: &RoomSnapshot, next: &RoomSnapshot) -> bool {
    prev.active_speaker_id == next.active_speaker_id
        && prev.selected_peer_id == next.selected_peer_id
        && Arc::ptr_eq(&prev.peers, &next.peers)
        && Arc::ptr_eq(&prev.consumers, &next.consumers)
        && Arc::ptr_eq(&prev.spotlights, &next.spotlights)
        && prev.my_id == next.my_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::participant::Participant;

    #[test]
    fn test_clone_is_equal() {
        let snapshot = RoomSnapshot::new("me");
        assert!(snapshots_equal(&snapshot, &snapshot.clone()));
    }

    #[test]
    fn test_scalar_changes_are_detected() {
        let prev = RoomSnapshot::new("me");

        let mut next = prev.clone();
        next.active_speaker_id = Some("a".to_string());
        assert!(!snapshots_equal(&prev, &next));

        let mut next = prev.clone();
        next.selected_peer_id = Some("a".to_string());
        assert!(!snapshots_equal(&prev, &next));

        let mut next = prev.clone();
        next.my_id = "other".to_string();
        assert!(!snapshots_equal(&prev, &next));
    }

    #[test]
    fn test_collections_compare_by_identity() {
        let prev = RoomSnapshot::new("me");

        // Same contents, new allocation.
        let mut next = prev.clone();
        next.peers = Arc::new(ParticipantMap::new());
        assert!(!snapshots_equal(&prev, &next));

        let mut next = prev.clone();
        next.consumers = Arc::new(ConsumerMap::new());
        assert!(!snapshots_equal(&prev, &next));

        let mut next = prev.clone();
        next.spotlights = Arc::new(Vec::new());
        assert!(!snapshots_equal(&prev, &next));

        let mut next = prev.clone();
        next.peers = Arc::new([Participant::new("a", &[])].into_iter().collect());
        assert!(!snapshots_equal(&prev, &next));
    }

    #[test]
    fn test_advanced_mode_is_ignored() {
        let prev = RoomSnapshot::new("me");
        let mut next = prev.clone();
        next.advanced_mode = true;
        assert!(snapshots_equal(&prev, &next));
    }
}
