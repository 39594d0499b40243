use crate::action::Action;
use crate::action_sender::ActionSender;
use crate::store_event::StoreEvent;

pub type EventSender<T> = tokio::sync::mpsc::UnboundedSender<T>;

pub(crate) struct EventSenderHolder {
    event_sender: EventSender<StoreEvent>,
}

impl EventSenderHolder {
    pub fn new(event_sender: EventSender<StoreEvent>) -> Self {
        Self { event_sender }
    }

    /// Returns `false` once the update loop is gone.
    pub fn send_event(&self, evt: StoreEvent) -> bool {
        self.event_sender.send(evt).is_ok()
    }
}

impl ActionSender for EventSenderHolder {
    type SendableAction = Action;

    fn send(&self, action: Action) {
        let name = action.name.clone();
        if !self.send_event(StoreEvent::Action(action)) {
            log::debug!("Store is gone, dropping {}", name);
        }
    }
}
