use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::action_creator::{ActionCreator, ActionCreators, TypedActionCreator};
use crate::action_sender::{ActionSender, Dispatch, DispatchId};
use crate::args::IntoPayload;
use crate::error::PayloadError;

/// An action creator that dispatches what it creates.
#[derive(Debug, Clone)]
pub struct BoundAction {
    creator: ActionCreator,
    dispatch: Dispatch,
}

impl BoundAction {
    pub fn name(&self) -> &str {
        self.creator.name()
    }

    pub fn call<I>(&self, args: I)
    where
        I: IntoIterator<Item = Value>,
    {
        self.dispatch.send(self.creator.create(args));
    }
}

pub struct TypedBoundAction<Args> {
    creator: TypedActionCreator<Args>,
    dispatch: Dispatch,
}

impl<Args> Clone for TypedBoundAction<Args> {
    fn clone(&self) -> Self {
        Self {
            creator: self.creator.clone(),
            dispatch: self.dispatch.clone(),
        }
    }
}

impl<Args> TypedBoundAction<Args>
where
    Args: IntoPayload,
{
    pub fn name(&self) -> &str {
        self.creator.name()
    }

    /// Nothing is dispatched when an argument fails to encode.
    pub fn call(&self, args: Args) -> Result<(), PayloadError> {
        let action = self.creator.create(args)?;
        self.dispatch.send(action);
        Ok(())
    }
}

/// Every creator of an [`ActionCreators`] bound to one dispatch handle.
#[derive(Debug, Clone)]
pub struct BoundActions {
    creators: ActionCreators,
    dispatch: Dispatch,
    actions: Arc<HashMap<Arc<str>, BoundAction>>,
}

impl BoundActions {
    pub fn get(&self, name: &str) -> Option<&BoundAction> {
        self.actions.get(name)
    }

    pub fn typed<Args>(&self, name: &str) -> Option<TypedBoundAction<Args>>
    where
        Args: IntoPayload + 'static,
    {
        let creator = self.creators.typed(name)?;
        Some(TypedBoundAction {
            creator,
            dispatch: self.dispatch.clone(),
        })
    }

    /// Identity of the dispatch handle these actions push into.
    pub fn dispatch_id(&self) -> DispatchId {
        self.dispatch.id()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(|name| name.as_ref())
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl ActionCreators {
    /// Wraps every creator so that calling it sends the action to `dispatch`.
    pub fn bind(&self, dispatch: &Dispatch) -> BoundActions {
        let actions = self
            .iter()
            .map(|creator| {
                let bound = BoundAction {
                    creator: creator.clone(),
                    dispatch: dispatch.clone(),
                };
                (Arc::from(creator.name()), bound)
            })
            .collect::<HashMap<_, _>>();
        BoundActions {
            creators: self.clone(),
            dispatch: dispatch.clone(),
            actions: Arc::new(actions),
        }
    }
}
