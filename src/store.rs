use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::AbortHandle;

use crate::action::Action;
use crate::action_sender::{ActionSender, Dispatch};
use crate::error::NoRuntime;
use crate::reducer::Reducer;
use crate::state_provider::{BorrowedState, ChangeObserver, StateProvider};

use super::engine::StoreEngine;

/// State root: owns the state and applies dispatched actions one at a time,
/// in the order they were sent.
///
/// The update loop runs on the tokio runtime current at creation. Dropping
/// the store stops it.
pub struct Store<State>
where
    State: PartialEq + Clone + Send + 'static,
{
    engine: StoreEngine<State>,
    handle: AbortHandle,
}

impl<State> Store<State>
where
    State: PartialEq + Clone + Send + 'static,
{
    /// # Panics
    ///
    /// Outside a tokio runtime. Use [`Store::try_new`] to get an error instead.
    pub fn new<R: Reducer<State> + Sync + Send + 'static>(state: State, reducer: R) -> Self {
        Self::try_new(state, reducer).unwrap_or_else(|err| panic!("{err}"))
    }

    pub fn try_new<R: Reducer<State> + Sync + Send + 'static>(
        state: State,
        reducer: R,
    ) -> Result<Self, NoRuntime> {
        let runtime = Handle::try_current().map_err(|_| NoRuntime)?;
        let engine = StoreEngine::new(state, reducer);
        let handle = engine.run_loop(&runtime);
        Ok(Self { engine, handle })
    }

    pub fn dispatch(&self) -> Dispatch {
        self.engine.dispatch()
    }

    /// Waits until every action sent before this call has been applied.
    ///
    /// If reducers panicked meanwhile, the oldest of those panics is resumed
    /// here; the rest wait for the following calls. A panic is only surfaced
    /// through `settle`: reading the state alone never reports it.
    pub async fn settle(&self) {
        self.engine.settle().await
    }
}

impl<State> StateProvider for Store<State>
where
    State: PartialEq + Clone + Send + 'static,
{
    type State = State;

    fn state(&self) -> BorrowedState<'_, State> {
        self.engine.state()
    }
}

impl<State> ChangeObserver for Store<State>
where
    State: PartialEq + Clone + Send + 'static,
{
    fn observe(&self) -> broadcast::Receiver<()> {
        self.engine.observe()
    }
}

impl<State> ActionSender for Store<State>
where
    State: PartialEq + Clone + Send + 'static,
{
    type SendableAction = Action;

    fn send(&self, action: Action) {
        self.engine.dispatch().send(action);
    }
}

impl<State> Drop for Store<State>
where
    State: PartialEq + Clone + Send + 'static,
{
    fn drop(&mut self) {
        self.handle.abort();
    }
}
