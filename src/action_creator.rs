use std::any::TypeId;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;

use crate::action::Action;
use crate::args::IntoPayload;
use crate::error::PayloadError;
use crate::resolver::ResolverMap;

/// Builds actions for one resolver. The action name is fixed at synthesis time.
#[derive(Debug, Clone)]
pub struct ActionCreator {
    name: Arc<str>,
    arity: usize,
    signature: TypeId,
}

impl ActionCreator {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Arity declared by the resolver. Informational: `create` does not check it.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Builds the action from call-site arguments. Zero arguments yields an
    /// action without a payload.
    pub fn create<I>(&self, args: I) -> Action
    where
        I: IntoIterator<Item = Value>,
    {
        Action::with_args(self.name.as_ref(), args.into_iter().collect())
    }

    pub(crate) fn typed<Args>(&self) -> Option<TypedActionCreator<Args>>
    where
        Args: IntoPayload + 'static,
    {
        (self.signature == TypeId::of::<Args>()).then(|| TypedActionCreator {
            name: self.name.clone(),
            _phantom: PhantomData,
        })
    }
}

/// Action creator whose argument tuple matches the resolver's declaration.
pub struct TypedActionCreator<Args> {
    name: Arc<str>,
    _phantom: PhantomData<fn(Args)>,
}

impl<Args> Clone for TypedActionCreator<Args> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<Args> TypedActionCreator<Args>
where
    Args: IntoPayload,
{
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn create(&self, args: Args) -> Result<Action, PayloadError> {
        let args = args.into_payload(&self.name)?;
        Ok(Action::with_args(self.name.as_ref(), args))
    }
}

/// Name to creator mapping derived from a [`ResolverMap`].
#[derive(Debug, Clone, Default)]
pub struct ActionCreators {
    creators: Arc<HashMap<Arc<str>, ActionCreator>>,
}

impl ActionCreators {
    pub fn get(&self, name: &str) -> Option<&ActionCreator> {
        self.creators.get(name)
    }

    /// Looks up `name` and checks that its resolver takes exactly `Args`.
    pub fn typed<Args>(&self, name: &str) -> Option<TypedActionCreator<Args>>
    where
        Args: IntoPayload + 'static,
    {
        self.get(name)?.typed()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.creators.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.creators.keys().map(|name| name.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionCreator> {
        self.creators.values()
    }

    pub fn len(&self) -> usize {
        self.creators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creators.is_empty()
    }
}

pub fn make_action_creators<State: 'static>(resolvers: &ResolverMap<State>) -> ActionCreators {
    let creators: HashMap<_, _> = resolvers
        .entries()
        .map(|(name, entry)| {
            let creator = ActionCreator {
                name: name.clone(),
                arity: entry.arity(),
                signature: entry.signature(),
            };
            (name.clone(), creator)
        })
        .collect();
    ActionCreators {
        creators: Arc::new(creators),
    }
}

/// Same as [`make_action_creators`]; `initial_state` only pins the state type.
pub fn make_action_creators_with<State: 'static>(
    resolvers: &ResolverMap<State>,
    _initial_state: &State,
) -> ActionCreators {
    make_action_creators(resolvers)
}
