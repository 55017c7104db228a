//! Participant and consumer records as supplied by the room store.
//!
//! The filmstrip only reads these. `ParticipantMap` keeps participants in
//! insertion order so that every enumeration (fallback speaker, thumbnail
//! strip) is reproducible.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// What a consumer carries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConsumerSource {
    Mic,
    Webcam,
    Screen,
    ExtraVideo,
    Other(String),
}

impl From<String> for ConsumerSource {
    fn from(source: String) -> Self {
        match source.as_str() {
            "mic" => ConsumerSource::Mic,
            "webcam" | "camera" => ConsumerSource::Webcam,
            "screen" => ConsumerSource::Screen,
            "extravideo" => ConsumerSource::ExtraVideo,
            _ => ConsumerSource::Other(source),
        }
    }
}

impl From<ConsumerSource> for String {
    fn from(source: ConsumerSource) -> Self {
        source.to_string()
    }
}

impl fmt::Display for ConsumerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsumerSource::Mic => write!(f, "mic"),
            ConsumerSource::Webcam => write!(f, "webcam"),
            ConsumerSource::Screen => write!(f, "screen"),
            ConsumerSource::ExtraVideo => write!(f, "extravideo"),
            ConsumerSource::Other(other) => write!(f, "{other}"),
        }
    }
}

/// An inbound media stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consumer {
    pub id: String,
    pub source: ConsumerSource,
}

impl Consumer {
    pub fn new(id: &str, source: ConsumerSource) -> Self {
        Self {
            id: id.to_string(),
            source,
        }
    }
}

/// A conference member and the consumers it outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    #[serde(default)]
    pub consumers: Vec<String>,
}

impl Participant {
    pub fn new(id: &str, consumers: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            consumers: consumers.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Participants keyed by id, enumerated in insertion order.
///
/// Re-inserting an existing id replaces the record but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Participant>", into = "Vec<Participant>")]
pub struct ParticipantMap {
    order: Vec<String>,
    entries: HashMap<String, Participant>,
}

impl ParticipantMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, participant: Participant) {
        if !self.entries.contains_key(&participant.id) {
            self.order.push(participant.id.clone());
        }
        self.entries.insert(participant.id.clone(), participant);
    }

    pub fn remove(&mut self, id: &str) -> Option<Participant> {
        let removed = self.entries.remove(id)?;
        self.order.retain(|existing| existing != id);
        Some(removed)
    }

    pub fn get(&self, id: &str) -> Option<&Participant> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

impl From<Vec<Participant>> for ParticipantMap {
    fn from(participants: Vec<Participant>) -> Self {
        participants.into_iter().collect()
    }
}

impl From<ParticipantMap> for Vec<Participant> {
    fn from(mut map: ParticipantMap) -> Self {
        let order = std::mem::take(&mut map.order);
        order
            .into_iter()
            .filter_map(|id| map.entries.remove(&id))
            .collect()
    }
}

impl FromIterator<Participant> for ParticipantMap {
    fn from_iter<I: IntoIterator<Item = Participant>>(iter: I) -> Self {
        let mut map = ParticipantMap::new();
        for participant in iter {
            map.insert(participant);
        }
        map
    }
}

/// Consumers keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Consumer>", into = "Vec<Consumer>")]
pub struct ConsumerMap {
    entries: HashMap<String, Consumer>,
}

impl ConsumerMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, consumer: Consumer) {
        self.entries.insert(consumer.id.clone(), consumer);
    }

    pub fn get(&self, id: &str) -> Option<&Consumer> {
        self.entries.get(id)
    }
}

impl From<Vec<Consumer>> for ConsumerMap {
    fn from(consumers: Vec<Consumer>) -> Self {
        consumers.into_iter().collect()
    }
}

impl From<ConsumerMap> for Vec<Consumer> {
    fn from(map: ConsumerMap) -> Self {
        let mut consumers: Vec<Consumer> = map.entries.into_values().collect();
        consumers.sort_by(|a, b| a.id.cmp(&b.id));
        consumers
    }
}

impl FromIterator<Consumer> for ConsumerMap {
    fn from_iter<I: IntoIterator<Item = Consumer>>(iter: I) -> Self {
        let mut map = ConsumerMap::new();
        for consumer in iter {
            map.insert(consumer);
        }
        map
    }
}

/// Whether the participant is sending screen content next to its camera.
///
/// Only a `screen` consumer is looked for, camera presence is assumed.
/// Consumer ids missing from `consumers` are skipped.
pub fn is_dual_stream(participant_id: &str, peers: &ParticipantMap, consumers: &ConsumerMap) -> bool {
    let Some(participant) = peers.get(participant_id) else {
        return false;
    };
    participant.consumers.iter().any(|consumer_id| {
        consumers
            .get(consumer_id)
            .is_some_and(|consumer| consumer.source == ConsumerSource::Screen)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peers() -> ParticipantMap {
        [
            Participant::new("zoe", &["c1", "c2"]),
            Participant::new("adam", &["c3"]),
            Participant::new("mia", &["c4", "missing"]),
        ]
        .into_iter()
        .collect()
    }

    fn consumers() -> ConsumerMap {
        [
            Consumer::new("c1", ConsumerSource::Webcam),
            Consumer::new("c2", ConsumerSource::Screen),
            Consumer::new("c3", ConsumerSource::Mic),
            Consumer::new("c4", ConsumerSource::Webcam),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_participant_map_keeps_insertion_order() {
        let mut map = peers();
        assert_eq!(map.ids().collect::<Vec<_>>(), vec!["zoe", "adam", "mia"]);

        map.insert(Participant::new("adam", &["c9"]));
        assert_eq!(map.ids().collect::<Vec<_>>(), vec!["zoe", "adam", "mia"]);
        assert_eq!(map.get("adam").map(|p| p.consumers.len()), Some(1));

        assert!(map.remove("zoe").is_some());
        assert!(map.remove("zoe").is_none());
        assert_eq!(map.ids().collect::<Vec<_>>(), vec!["adam", "mia"]);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_is_dual_stream() {
        let peers = peers();
        let consumers = consumers();

        assert!(is_dual_stream("zoe", &peers, &consumers));
        assert!(!is_dual_stream("adam", &peers, &consumers));
        assert!(!is_dual_stream("mia", &peers, &consumers));
        assert!(!is_dual_stream("nobody", &peers, &consumers));
    }

    #[test]
    fn test_screen_only_counts_as_dual_stream() {
        let peers: ParticipantMap = [Participant::new("solo", &["s"])].into_iter().collect();
        let consumers: ConsumerMap = [Consumer::new("s", ConsumerSource::Screen)]
            .into_iter()
            .collect();
        assert!(is_dual_stream("solo", &peers, &consumers));
    }

    #[test]
    fn test_deserialize_participants_in_order() {
        let json = r#"[
            {"id": "b", "consumers": ["x"]},
            {"id": "a"}
        ]"#;
        let map: ParticipantMap = serde_json::from_str(json).unwrap();
        assert_eq!(map.ids().collect::<Vec<_>>(), vec!["b", "a"]);
        assert!(map.get("a").unwrap().consumers.is_empty());
    }

    #[test]
    fn test_consumer_source_strings() {
        let consumer: Consumer =
            serde_json::from_str(r#"{"id": "c", "source": "screen"}"#).unwrap();
        assert_eq!(consumer.source, ConsumerSource::Screen);

        let consumer: Consumer =
            serde_json::from_str(r#"{"id": "c", "source": "hologram"}"#).unwrap();
        assert_eq!(
            consumer.source,
            ConsumerSource::Other("hologram".to_string())
        );
        assert_eq!(
            serde_json::to_string(&ConsumerSource::ExtraVideo).unwrap(),
            "\"extravideo\""
        );
    }
}
