use tokio::sync::mpsc;

/// Commands the filmstrip sends to the room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomControlCommand {
    SetSelectedPeer(String),
}

/// The room-control collaborator. Calls are fire-and-forget.
pub trait RoomControl {
    fn set_selected_peer(&self, peer_id: &str);
}

/// [`RoomControl`] backed by an unbounded channel, drained by the
/// room service on its own runtime.
#[derive(Debug, Clone)]
pub struct RoomControlSender {
    command_tx: mpsc::UnboundedSender<RoomControlCommand>,
}

impl RoomControlSender {
    pub fn new(command_tx: mpsc::UnboundedSender<RoomControlCommand>) -> Self {
        Self { command_tx }
    }

    /// Creates a sender together with the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<RoomControlCommand>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        (Self::new(command_tx), command_rx)
    }
}

impl RoomControl for RoomControlSender {
    fn set_selected_peer(&self, peer_id: &str) {
        log::info!("RoomControlSender::set_selected_peer: {peer_id}");
        let res = self
            .command_tx
            .send(RoomControlCommand::SetSelectedPeer(peer_id.to_string()));
        if let Err(e) = res {
            log::error!("RoomControlSender::set_selected_peer: failed to send command: {e:?}");
        }
    }
}
