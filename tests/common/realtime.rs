//! Realtime test helpers

use tokio::sync::mpsc::UnboundedReceiver;

use socialhub::shared::ServerEvent;

/// Take every frame already queued for a session
pub fn drain(rx: &mut UnboundedReceiver<ServerEvent>) -> Vec<ServerEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Message of the single `error` frame queued for a session
pub fn single_error(rx: &mut UnboundedReceiver<ServerEvent>) -> String {
    match drain(rx).as_slice() {
        [ServerEvent::Error(payload)] => payload.message.clone(),
        other => panic!("Expected one error frame, got {:?}", other),
    }
}
