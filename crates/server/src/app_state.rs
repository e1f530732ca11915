use scorebook::MatchSession;
use shared::protocol::MatchEvent;
use tokio::sync::{broadcast, Mutex};

pub(crate) struct AppState {
    pub(crate) session: Mutex<MatchSession>,
    pub(crate) events: broadcast::Sender<MatchEvent>,
}

impl AppState {
    pub(crate) fn new(session: MatchSession) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            session: Mutex::new(session),
            events,
        }
    }

    pub(crate) fn publish(&self, event: &MatchEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event.clone());
    }
}
