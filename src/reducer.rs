use crate::action::Action;
use crate::error::Rejected;
use crate::resolver::ResolverMap;

pub trait Reducer<State> {
    fn reduce(&self, state: State, action: &Action) -> State;
}

impl<State, F> Reducer<State> for F
where
    F: Fn(State, &Action) -> State,
{
    fn reduce(&self, state: State, action: &Action) -> State {
        self(state, action)
    }
}

/// Dispatch-table reducer synthesised from a [`ResolverMap`].
pub struct ResolverReducer<State> {
    resolvers: ResolverMap<State>,
    initial_state: State,
}

impl<State: Clone> Clone for ResolverReducer<State> {
    fn clone(&self) -> Self {
        Self {
            resolvers: self.resolvers.clone(),
            initial_state: self.initial_state.clone(),
        }
    }
}

impl<State> ResolverReducer<State>
where
    State: 'static,
{
    pub fn initial_state(&self) -> &State {
        &self.initial_state
    }

    pub fn resolvers(&self) -> &ResolverMap<State> {
        &self.resolvers
    }

    /// Like [`Reducer::reduce`], but reports a payload that does not decode
    /// into the resolver's parameters instead of passing the state through.
    pub fn try_reduce(&self, state: State, action: &Action) -> Result<State, Rejected<State>> {
        match self.resolvers.get(&action.name) {
            Some(entry) => entry.apply(state, &action.name, action.args()),
            None => {
                log::trace!("No resolver for {}, passing state through", action.name);
                Ok(state)
            }
        }
    }
}

impl<State> ResolverReducer<State>
where
    State: Clone + 'static,
{
    /// Applies `action` to the initial state.
    pub fn reduce_initial(&self, action: &Action) -> State {
        self.reduce(self.initial_state.clone(), action)
    }
}

impl<State> Reducer<State> for ResolverReducer<State>
where
    State: 'static,
{
    fn reduce(&self, state: State, action: &Action) -> State {
        self.try_reduce(state, action).unwrap_or_else(|rejected| {
            log::warn!("Ignoring {}: {}", action.name, rejected.error);
            rejected.into_state()
        })
    }
}

pub fn make_reducer<State: 'static>(
    resolvers: ResolverMap<State>,
    initial_state: State,
) -> ResolverReducer<State> {
    ResolverReducer {
        resolvers,
        initial_state,
    }
}
