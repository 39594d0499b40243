use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures::lock::Mutex;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, oneshot};

use crate::action::Action;
use crate::action_sender::{Dispatch, DispatchId};
use crate::event_sender_holder::EventSenderHolder;
use crate::reducer::Reducer;
use crate::state_provider::BorrowedState;
use crate::store_event::{Failure, StoreEvent};

type EventReceiver<T> = tokio::sync::mpsc::UnboundedReceiver<T>;

const CHANGE_CAPACITY: usize = 16;

pub(crate) struct StoreEngine<State>
where
    State: PartialEq + Clone + Send + 'static,
{
    id: DispatchId,
    state: Arc<parking_lot::Mutex<State>>,
    reducer: Arc<dyn Reducer<State> + Sync + Send + 'static>,
    event_sender: Arc<EventSenderHolder>,
    event_reciever: Arc<Mutex<EventReceiver<StoreEvent>>>,
    changes: broadcast::Sender<()>,
}

impl<State> StoreEngine<State>
where
    State: PartialEq + Clone + Send + 'static,
{
    pub fn new(state: State, reducer: impl Reducer<State> + Sync + Send + 'static) -> Self {
        let (event_sender, event_reciever) = tokio::sync::mpsc::unbounded_channel::<StoreEvent>();
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);

        Self {
            id: DispatchId::next(),
            state: Arc::new(parking_lot::Mutex::new(state)),
            reducer: Arc::new(reducer),
            event_sender: Arc::new(EventSenderHolder::new(event_sender)),
            event_reciever: Arc::new(Mutex::new(event_reciever)),
            changes,
        }
    }

    pub fn state(&self) -> BorrowedState<'_, State> {
        self.state.lock()
    }

    pub fn dispatch(&self) -> Dispatch {
        Dispatch::new(self.id, self.event_sender.clone())
    }

    pub fn observe(&self) -> broadcast::Receiver<()> {
        self.changes.subscribe()
    }

    pub async fn settle(&self) {
        let (ack, settled) = oneshot::channel();
        if !self.event_sender.send_event(StoreEvent::Settle(ack)) {
            log::debug!("Store loop is gone, nothing to settle");
            return;
        }
        match settled.await {
            Ok(Some(failure)) => panic::resume_unwind(failure),
            Ok(None) => {}
            Err(_) => log::debug!("Store loop stopped before settling"),
        }
    }

    pub fn run_loop(&self, runtime: &Handle) -> tokio::task::AbortHandle {
        let receiver = self.event_reciever.clone();
        let reducer = self.reducer.clone();
        let state = self.state.clone();
        let changes = self.changes.clone();

        let handle = runtime.spawn(async move {
            let mut event_receiver = receiver.lock().await;
            // One failure is resumed per settle, oldest first.
            let mut failures: VecDeque<Failure> = VecDeque::new();

            while let Some(event) = event_receiver.recv().await {
                match event {
                    StoreEvent::Action(action) => {
                        log::debug!("Handling {:?}", action);
                        if let Err(panic) = process(&state, &action, reducer.as_ref(), &changes) {
                            log::warn!(
                                "Reducer panicked on {}, state left unchanged",
                                action.name
                            );
                            failures.push_back(panic);
                        }
                    }
                    StoreEvent::Settle(ack) => {
                        let _ = ack.send(failures.pop_front());
                    }
                }
            }
        });

        handle.abort_handle()
    }
}

fn process<State>(
    state: &parking_lot::Mutex<State>,
    action: &Action,
    reducer: &(dyn Reducer<State> + Sync + Send + 'static),
    changes: &broadcast::Sender<()>,
) -> Result<(), Failure>
where
    State: PartialEq + Clone,
{
    let state_before = state.lock().clone();
    let next = panic::catch_unwind(AssertUnwindSafe(|| reducer.reduce(state_before, action)))?;

    // The loop is the only writer, so the locked state is still the one reduced.
    let mut current = state.lock();
    if next != *current {
        *current = next;
        let _ = changes.send(());
    }
    Ok(())
}
