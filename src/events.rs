use crate::models::{SessionStatus, TranscriptSegment};
use tokio::sync::broadcast;

/// Grounded on the teacher's `EventBus` (`tokio::sync::broadcast`) and `routes/stream.rs`'s
/// replay-then-subscribe loop. One process-wide channel; subscribers filter by
/// `live_session_id` themselves rather than the bus maintaining per-session topics, same
/// as the teacher's single `ChatEvent` broadcast filtered per-room by route handlers.
#[derive(Debug, Clone)]
pub enum LiveEvent {
    Segment {
        live_session_id: String,
        segment: TranscriptSegment,
    },
    StatusChanged {
        live_session_id: String,
        status: SessionStatus,
    },
}

impl LiveEvent {
    pub fn live_session_id(&self) -> &str {
        match self {
            LiveEvent::Segment { live_session_id, .. } => live_session_id,
            LiveEvent::StatusChanged { live_session_id, .. } => live_session_id,
        }
    }
}

pub struct EventBus {
    pub sender: broadcast::Sender<LiveEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1024);
        EventBus { sender }
    }

    pub fn publish(&self, event: LiveEvent) {
        let _ = self.sender.send(event);
    }
}
