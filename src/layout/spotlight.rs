use crate::room::participant::ParticipantMap;

/// Spotlighted participants in room order, plus the hidden-count badge.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpotlightPartition<'a> {
    pub shown: Vec<&'a str>,
    /// Participants not covered by the spotlight list. Zero means no badge.
    pub hidden_count: usize,
}

impl SpotlightPartition<'_> {
    pub fn has_hidden_badge(&self) -> bool {
        self.hidden_count > 0
    }
}

pub fn partition_spotlights<'a>(spotlights: &[String], peers: &'a ParticipantMap) -> SpotlightPartition<'a> {
    let shown = peers
        .ids()
        .filter(|id| spotlights.iter().any(|spotlight| spotlight == id))
        .collect();

    SpotlightPartition {
        shown,
        hidden_count: peers.len().saturating_sub(spotlights.len()),
    }
}
