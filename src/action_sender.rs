use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::action::Action;

pub trait ActionSender: Send {
    type SendableAction;

    fn send(&self, action: Self::SendableAction);
}

/// Identity of a dispatch handle. Handles cloned from the same state root
/// share it; a rebuilt root gets a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DispatchId(u64);

impl DispatchId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Handle that pushes actions into a state root's update queue.
#[derive(Clone)]
pub struct Dispatch {
    id: DispatchId,
    sender: Arc<dyn ActionSender<SendableAction = Action> + Sync>,
}

impl Dispatch {
    pub fn new(
        id: DispatchId,
        sender: Arc<dyn ActionSender<SendableAction = Action> + Sync>,
    ) -> Self {
        Self { id, sender }
    }

    pub fn id(&self) -> DispatchId {
        self.id
    }
}

impl ActionSender for Dispatch {
    type SendableAction = Action;

    fn send(&self, action: Action) {
        self.sender.send(action)
    }
}

impl fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatch").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod test {
    use parking_lot::Mutex;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<Action>>,
    }

    impl ActionSender for Recorder {
        type SendableAction = Action;

        fn send(&self, action: Action) {
            self.sent.lock().push(action);
        }
    }

    #[test]
    fn test_dispatch_forwards_to_sender() {
        let recorder = Arc::new(Recorder::default());
        let dispatch = Dispatch::new(DispatchId::next(), recorder.clone());
        dispatch.send(Action::new("first"));
        dispatch.clone().send(Action::new("second"));

        let names: Vec<_> = recorder.sent.lock().iter().map(|a| a.name.clone()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(DispatchId::next(), DispatchId::next());
    }
}
