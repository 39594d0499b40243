//! Derive action creators, a dispatch-table reducer and a bound-action hook
//! from one map of curried resolvers.
//!
//! ```
//! use resolvers::{make_action_creators, make_reducer, Action, Reducer, ResolverMap};
//!
//! let counter = ResolverMap::builder()
//!     .resolver("increment", |state: i32| move || state + 1)
//!     .resolver("add", |state: i32| move |amount: i32| state + amount)
//!     .build();
//!
//! let creators = make_action_creators(&counter);
//! let reducer = make_reducer(counter, 0);
//!
//! let add = creators.typed::<(i32,)>("add").unwrap();
//! let state = reducer.reduce(1, &add.create((5,)).unwrap());
//! assert_eq!(state, 6);
//! assert_eq!(reducer.reduce(state, &Action::new("multiply")), 6);
//! ```

mod action;
mod action_creator;
mod action_sender;
mod args;
mod bound_action;
mod engine;
mod error;
mod event_sender_holder;
mod hook;
mod reducer;
mod resolver;
mod state_provider;
mod store;
mod store_event;

pub use action::{Action, EmptyPayload, Payload};
pub use action_creator::{
    make_action_creators, make_action_creators_with, ActionCreator, ActionCreators,
    TypedActionCreator,
};
pub use action_sender::{ActionSender, Dispatch, DispatchId};
pub use args::{FromPayload, IntoPayload, Transition};
pub use bound_action::{BoundAction, BoundActions, TypedBoundAction};
pub use error::{NoRuntime, PayloadError, Rejected};
pub use hook::{make_resolvers, HookContext, HookId, Resolvers, Root};
pub use reducer::{make_reducer, Reducer, ResolverReducer};
pub use resolver::{ResolverMap, ResolverMapBuilder};
pub use state_provider::{BorrowedState, ChangeObserver, StateProvider};
pub use store::Store;
