use tokio::sync::broadcast;

pub type BorrowedState<'a, State> = lock_api::MutexGuard<'a, parking_lot::RawMutex, State>;

/// Read access to the state held by a state root.
pub trait StateProvider: Send {
    type State;

    fn state(&self) -> BorrowedState<'_, Self::State>;

    /// Copy of the current state, taken without holding the lock afterwards.
    fn snapshot(&self) -> Self::State
    where
        Self::State: Clone,
    {
        self.state().clone()
    }
}

pub trait ChangeObserver {
    /// Ticks every time an applied action produced a different state.
    fn observe(&self) -> broadcast::Receiver<()>;
}
