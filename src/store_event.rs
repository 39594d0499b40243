use std::any::Any;

use tokio::sync::oneshot;

use crate::action::Action;

/// Panic payload captured from a reducer run by the update loop.
pub(crate) type Failure = Box<dyn Any + Send>;

pub(crate) enum StoreEvent {
    Action(Action),
    /// Acknowledged once every event queued before it has been handled.
    Settle(oneshot::Sender<Option<Failure>>),
}
