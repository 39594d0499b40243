use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::args::{FromPayload, Transition};
use crate::error::Rejected;

type ApplyFn<State> = dyn Fn(State, &str, &[Value]) -> Result<State, Rejected<State>> + Send + Sync;

/// One registered resolver with its argument signature erased.
pub(crate) struct ResolverEntry<State> {
    arity: usize,
    signature: TypeId,
    apply: Arc<ApplyFn<State>>,
}

impl<State> Clone for ResolverEntry<State> {
    fn clone(&self) -> Self {
        Self {
            arity: self.arity,
            signature: self.signature,
            apply: self.apply.clone(),
        }
    }
}

impl<State> ResolverEntry<State> {
    pub(crate) fn arity(&self) -> usize {
        self.arity
    }

    pub(crate) fn signature(&self) -> TypeId {
        self.signature
    }

    pub(crate) fn apply(
        &self,
        state: State,
        name: &str,
        args: &[Value],
    ) -> Result<State, Rejected<State>> {
        (self.apply)(state, name, args)
    }
}

/// Immutable registry of named resolvers.
///
/// Cloning is cheap: every clone shares the same entries.
pub struct ResolverMap<State> {
    entries: Arc<HashMap<Arc<str>, ResolverEntry<State>>>,
}

impl<State> Clone for ResolverMap<State> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<State> ResolverMap<State>
where
    State: 'static,
{
    pub fn builder() -> ResolverMapBuilder<State> {
        ResolverMapBuilder::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of arguments the resolver's second stage declares.
    pub fn arity(&self, name: &str) -> Option<usize> {
        self.entries.get(name).map(ResolverEntry::arity)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|name| name.as_ref())
    }

    pub(crate) fn get(&self, name: &str) -> Option<&ResolverEntry<State>> {
        self.entries.get(name)
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (&Arc<str>, &ResolverEntry<State>)> {
        self.entries.iter()
    }
}

impl<State> fmt::Debug for ResolverMap<State> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(name, entry)| (name, entry.arity)))
            .finish()
    }
}

pub struct ResolverMapBuilder<State> {
    entries: HashMap<Arc<str>, ResolverEntry<State>>,
}

impl<State> Default for ResolverMapBuilder<State> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<State> ResolverMapBuilder<State>
where
    State: 'static,
{
    /// Registers `resolver` under `name`. A later registration with the same
    /// name replaces the earlier one.
    ///
    /// ```
    /// use resolvers::ResolverMap;
    ///
    /// let map = ResolverMap::builder()
    ///     .resolver("increment", |state: i32| move || state + 1)
    ///     .resolver("add", |state: i32| move |amount: i32| state + amount)
    ///     .build();
    /// assert_eq!(map.arity("add"), Some(1));
    /// ```
    pub fn resolver<F, T, Args>(mut self, name: impl Into<Arc<str>>, resolver: F) -> Self
    where
        F: Fn(State) -> T + Send + Sync + 'static,
        T: Transition<State, Args>,
        Args: FromPayload + 'static,
    {
        let apply: Arc<ApplyFn<State>> = Arc::new(move |state: State, name: &str, args: &[Value]| {
            match Args::from_payload(name, args) {
                Ok(args) => Ok(resolver(state).call(args)),
                Err(error) => Err(Rejected { state, error }),
            }
        });
        let entry = ResolverEntry {
            arity: Args::ARITY,
            signature: TypeId::of::<Args>(),
            apply,
        };
        self.entries.insert(name.into(), entry);
        self
    }

    pub fn build(self) -> ResolverMap<State> {
        ResolverMap {
            entries: Arc::new(self.entries),
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    fn counter() -> ResolverMap<i32> {
        ResolverMap::builder()
            .resolver("increment", |state: i32| move || state + 1)
            .resolver("decrement", |state: i32| move || state - 1)
            .resolver("add", |state: i32| move |amount: i32| state + amount)
            .build()
    }

    #[test]
    fn test_registry_lookup() {
        let map = counter();
        assert_eq!(map.len(), 3);
        assert!(map.contains("add"));
        assert!(!map.contains("multiply"));
        assert_eq!(map.arity("increment"), Some(0));
        assert_eq!(map.arity("add"), Some(1));
        assert_eq!(map.arity("multiply"), None);

        let mut names: Vec<_> = map.names().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["add", "decrement", "increment"]);
    }

    #[test]
    fn test_entry_applies_both_stages() {
        let map = counter();
        let add = map.get("add").unwrap();
        assert_eq!(add.apply(1, "add", &[json!(5)]).unwrap(), 6);
        assert_eq!(add.signature(), TypeId::of::<(i32,)>());
    }

    #[test]
    fn test_rejected_payload_returns_state() {
        let map = counter();
        let rejected = map
            .get("add")
            .unwrap()
            .apply(7, "add", &[json!("five")])
            .unwrap_err();
        assert_eq!(rejected.state, 7);
        assert_eq!(rejected.error.index(), 0);
    }

    #[test]
    fn test_duplicate_name_last_write_wins() {
        let map = ResolverMap::builder()
            .resolver("step", |state: i32| move || state + 1)
            .resolver("step", |state: i32| move || state + 10)
            .build();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("step").unwrap().apply(0, "step", &[]).unwrap(), 10);
    }
}
