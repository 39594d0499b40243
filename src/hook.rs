//! Bound-action hook.
//!
//! [`make_resolvers`] wires the synthesised reducer and action creators to a
//! state root. Each call to [`Resolvers::use_resolvers`] reads the current
//! state from a [`HookContext`] and returns it together with actions bound to
//! the context's dispatch handle. Every hook gets its own slots in the
//! context, keyed by [`HookId`]. The bound actions are cached per dispatch
//! identity, so repeated instantiations hand out the same bundle until the
//! root is rebuilt.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::action_creator::{make_action_creators, ActionCreators};
use crate::action_sender::{Dispatch, DispatchId};
use crate::bound_action::BoundActions;
use crate::reducer::{make_reducer, Reducer, ResolverReducer};
use crate::resolver::ResolverMap;
use crate::state_provider::StateProvider;
use crate::store::Store;

/// Identity of one hook. Clones of a [`Resolvers`] share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

impl HookId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// The state/dispatch and memoisation primitives a hook runs against.
#[async_trait]
pub trait HookContext<State>: Send + Sync {
    /// Returns the current state and the dispatch handle of `hook`'s state
    /// root, creating the root from `reducer` and `initial_state` on first use.
    fn use_reducer<R>(
        &mut self,
        hook: HookId,
        reducer: &R,
        initial_state: &State,
    ) -> (State, Dispatch)
    where
        R: Reducer<State> + Clone + Sync + Send + 'static;

    /// Returns `hook`'s cached value, computing it when `dependency` differs
    /// from the one it was cached under.
    fn use_memo<T, F>(&mut self, hook: HookId, dependency: DispatchId, compute: F) -> T
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> T;

    /// Waits until every action dispatched so far has been applied.
    async fn settle(&self);
}

type MemoSlot = (DispatchId, Box<dyn Any + Send + Sync>);

/// Default [`HookContext`], backed by one [`Store`] per hook.
///
/// Stores are spawned on the tokio runtime current at a hook's first
/// instantiation, so that instantiation panics outside a runtime.
pub struct Root<State>
where
    State: PartialEq + Clone + Send + 'static,
{
    stores: HashMap<HookId, Store<State>>,
    memo: HashMap<(HookId, TypeId), MemoSlot>,
}

impl<State> Default for Root<State>
where
    State: PartialEq + Clone + Send + 'static,
{
    fn default() -> Self {
        Self {
            stores: HashMap::new(),
            memo: HashMap::new(),
        }
    }
}

impl<State> Root<State>
where
    State: PartialEq + Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self, hook: HookId) -> Option<&Store<State>> {
        self.stores.get(&hook)
    }

    /// Tears every state root down. The next instantiation of each hook
    /// starts over from its initial state with a new dispatch handle.
    pub fn reset(&mut self) {
        if !self.stores.is_empty() {
            log::debug!("Root reset, {} state roots will be rebuilt", self.stores.len());
        }
        self.stores.clear();
        self.memo.clear();
    }
}

#[async_trait]
impl<State> HookContext<State> for Root<State>
where
    State: PartialEq + Clone + Send + Sync + 'static,
{
    fn use_reducer<R>(
        &mut self,
        hook: HookId,
        reducer: &R,
        initial_state: &State,
    ) -> (State, Dispatch)
    where
        R: Reducer<State> + Clone + Sync + Send + 'static,
    {
        let store = self
            .stores
            .entry(hook)
            .or_insert_with(|| Store::new(initial_state.clone(), reducer.clone()));
        (store.snapshot(), store.dispatch())
    }

    fn use_memo<T, F>(&mut self, hook: HookId, dependency: DispatchId, compute: F) -> T
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> T,
    {
        let key = (hook, TypeId::of::<T>());
        let cached = self
            .memo
            .get(&key)
            .filter(|(id, _)| *id == dependency)
            .and_then(|(_, value)| value.downcast_ref::<T>());
        if let Some(value) = cached {
            return value.clone();
        }

        let value = compute();
        let boxed: Box<dyn Any + Send + Sync> = Box::new(value.clone());
        self.memo.insert(key, (dependency, boxed));
        value
    }

    async fn settle(&self) {
        for store in self.stores.values() {
            store.settle().await;
        }
    }
}

/// Hook factory produced by [`make_resolvers`].
pub struct Resolvers<State> {
    id: HookId,
    reducer: ResolverReducer<State>,
    creators: ActionCreators,
}

impl<State: Clone> Clone for Resolvers<State> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            reducer: self.reducer.clone(),
            creators: self.creators.clone(),
        }
    }
}

impl<State> Resolvers<State>
where
    State: Clone + Send + Sync + 'static,
{
    /// Reads the current state and returns it with the bound actions.
    ///
    /// With [`Root`], the first call for this hook spawns its store and
    /// therefore panics outside a tokio runtime. A resolver panic raised by a
    /// bound action is only reported by [`HookContext::settle`].
    pub fn use_resolvers<C>(&self, cx: &mut C) -> (State, BoundActions)
    where
        C: HookContext<State>,
    {
        let (state, dispatch) =
            cx.use_reducer(self.id, &self.reducer, self.reducer.initial_state());
        let creators = &self.creators;
        let actions = cx.use_memo(self.id, dispatch.id(), || creators.bind(&dispatch));
        (state, actions)
    }

    pub fn id(&self) -> HookId {
        self.id
    }

    pub fn reducer(&self) -> &ResolverReducer<State> {
        &self.reducer
    }

    pub fn action_creators(&self) -> &ActionCreators {
        &self.creators
    }
}

pub fn make_resolvers<State>(
    resolvers: ResolverMap<State>,
    initial_state: State,
) -> Resolvers<State>
where
    State: Clone + Send + Sync + 'static,
{
    let creators = make_action_creators(&resolvers);
    Resolvers {
        id: HookId::next(),
        reducer: make_reducer(resolvers, initial_state),
        creators,
    }
}

#[cfg(test)]
mod test {
    use std::cell::Cell;

    use serde_json::json;

    use super::*;
    use crate::action::Action;
    use crate::action_sender::ActionSender;

    fn counter() -> Resolvers<i32> {
        make_resolvers(
            ResolverMap::builder()
                .resolver("increment", |state: i32| move || state + 1)
                .resolver("decrement", |state: i32| move || state - 1)
                .resolver("add", |state: i32| move |amount: i32| state + amount)
                .build(),
            0,
        )
    }

    #[tokio::test]
    async fn test_counter_scenario() -> anyhow::Result<()> {
        let use_counter = counter();
        let mut root = Root::new();

        let (state, actions) = use_counter.use_resolvers(&mut root);
        assert_eq!(state, 0);

        actions.typed::<()>("increment").unwrap().call(())?;
        root.settle().await;
        let (state, actions) = use_counter.use_resolvers(&mut root);
        assert_eq!(state, 1);

        actions.typed::<(i32,)>("add").unwrap().call((5,))?;
        root.settle().await;
        let (state, actions) = use_counter.use_resolvers(&mut root);
        assert_eq!(state, 6);

        actions.get("decrement").unwrap().call([]);
        root.settle().await;
        let (state, _) = use_counter.use_resolvers(&mut root);
        assert_eq!(state, 5);
        Ok(())
    }

    #[tokio::test]
    async fn test_bound_actions_are_memoised_per_dispatch() {
        let use_counter = counter();
        let mut root = Root::new();

        let (_, first) = use_counter.use_resolvers(&mut root);
        first.get("increment").unwrap().call([]);
        root.settle().await;
        let (_, second) = use_counter.use_resolvers(&mut root);
        assert_eq!(first.dispatch_id(), second.dispatch_id());

        root.reset();
        let (state, rebuilt) = use_counter.use_resolvers(&mut root);
        assert_eq!(state, 0);
        assert_ne!(first.dispatch_id(), rebuilt.dispatch_id());
    }

    #[tokio::test]
    async fn test_updates_apply_in_call_order() {
        let use_counter = counter();
        let mut root = Root::new();

        let (_, actions) = use_counter.use_resolvers(&mut root);
        let add = actions.get("add").unwrap();
        add.call([json!(10)]);
        actions.get("decrement").unwrap().call([]);
        add.call([json!(-3)]);
        root.settle().await;

        let (state, _) = use_counter.use_resolvers(&mut root);
        assert_eq!(state, 6);
    }

    #[tokio::test]
    async fn test_unknown_action_leaves_state() {
        let use_counter = counter();
        let mut root = Root::new();
        let (_, actions) = use_counter.use_resolvers(&mut root);
        actions.get("add").unwrap().call([json!(5)]);
        root.settle().await;

        let store = root.store(use_counter.id()).unwrap();
        store.send(Action::with_args("multiply", vec![json!(2)]));
        root.settle().await;

        let (state, _) = use_counter.use_resolvers(&mut root);
        assert_eq!(state, 5);
    }

    #[tokio::test]
    async fn test_memo_recomputes_only_on_new_dependency() {
        let mut root: Root<i32> = Root::new();
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            calls.get()
        };

        let hook = HookId::next();
        let id = DispatchId::next();
        assert_eq!(root.use_memo(hook, id, compute), 1);
        assert_eq!(root.use_memo(hook, id, compute), 1);
        assert_eq!(root.use_memo(hook, DispatchId::next(), compute), 2);
        assert_eq!(root.use_memo(HookId::next(), id, compute), 3);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_hooks_on_one_root_keep_their_own_state() {
        let use_counter = counter();
        let use_scaler = make_resolvers(
            ResolverMap::builder()
                .resolver("double", |state: i32| move || state * 2)
                .build(),
            100,
        );
        let mut root = Root::new();

        let (count, counter_actions) = use_counter.use_resolvers(&mut root);
        let (scale, scaler_actions) = use_scaler.use_resolvers(&mut root);
        assert_eq!(count, 0);
        assert_eq!(scale, 100);
        assert_ne!(counter_actions.dispatch_id(), scaler_actions.dispatch_id());
        assert!(scaler_actions.get("double").is_some());
        assert!(scaler_actions.get("increment").is_none());
        assert!(counter_actions.get("double").is_none());

        counter_actions.get("increment").unwrap().call([]);
        scaler_actions.get("double").unwrap().call([]);
        root.settle().await;

        let (count, _) = use_counter.use_resolvers(&mut root);
        let (scale, _) = use_scaler.use_resolvers(&mut root);
        assert_eq!(count, 1);
        assert_eq!(scale, 200);

        let shared = use_scaler.clone();
        let (scale, again) = shared.use_resolvers(&mut root);
        assert_eq!(scale, 200);
        assert_eq!(again.dispatch_id(), scaler_actions.dispatch_id());
    }

    #[test]
    #[should_panic(expected = "tokio runtime")]
    fn test_first_use_outside_runtime_panics() {
        let mut root = Root::new();
        counter().use_resolvers(&mut root);
    }

    #[test]
    fn test_hook_parts_are_synthesised_once() {
        let use_counter = counter();
        assert_eq!(use_counter.action_creators().len(), 3);
        assert_eq!(*use_counter.reducer().initial_state(), 0);
    }
}
