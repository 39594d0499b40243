//! Type-level view of a resolver's second stage.
//!
//! A resolver is `Fn(State) -> T` where `T` is the closure that takes the
//! action's arguments. [`Transition`] is implemented for every
//! `FnOnce(A1, .., An) -> State`, so the argument tuple `(A1, .., An)` is
//! inferred from the closure itself. [`FromPayload`] and [`IntoPayload`] move
//! that tuple in and out of the positional payload carried by an action.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::PayloadError;

/// Second stage of a resolver: consumes the decoded arguments, yields the next state.
pub trait Transition<State, Args> {
    fn call(self, args: Args) -> State;
}

/// Argument tuple that can be decoded from an action payload.
///
/// Missing positions decode from `null`, so `Option` parameters become `None`.
/// Positions past the tuple's arity are ignored.
pub trait FromPayload: Sized {
    const ARITY: usize;

    fn from_payload(name: &str, args: &[Value]) -> Result<Self, PayloadError>;
}

/// Argument tuple that can be encoded into an action payload.
pub trait IntoPayload {
    fn into_payload(self, name: &str) -> Result<Vec<Value>, PayloadError>;
}

fn decode<T>(name: &str, args: &[Value], index: usize) -> Result<T, PayloadError>
where
    T: DeserializeOwned,
{
    let value = args.get(index).cloned().unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|source| PayloadError::Decode {
        name: name.to_owned(),
        index,
        source,
    })
}

fn encode<T: Serialize>(name: &str, value: T, index: usize) -> Result<Value, PayloadError> {
    serde_json::to_value(value).map_err(|source| PayloadError::Encode {
        name: name.to_owned(),
        index,
        source,
    })
}

macro_rules! impl_args {
    ($arity:expr; $($ty:ident => $index:tt),*) => {
        impl<F, State, $($ty,)*> Transition<State, ($($ty,)*)> for F
        where
            F: FnOnce($($ty),*) -> State,
        {
            #[allow(non_snake_case)]
            fn call(self, ($($ty,)*): ($($ty,)*)) -> State {
                self($($ty),*)
            }
        }

        impl<$($ty,)*> FromPayload for ($($ty,)*)
        where
            $($ty: DeserializeOwned,)*
        {
            const ARITY: usize = $arity;

            #[allow(unused_variables)]
            fn from_payload(name: &str, args: &[Value]) -> Result<Self, PayloadError> {
                Ok(($(decode::<$ty>(name, args, $index)?,)*))
            }
        }

        impl<$($ty,)*> IntoPayload for ($($ty,)*)
        where
            $($ty: Serialize,)*
        {
            #[allow(unused_variables)]
            fn into_payload(self, name: &str) -> Result<Vec<Value>, PayloadError> {
                Ok(vec![$(encode(name, self.$index, $index)?),*])
            }
        }
    };
}

impl_args!(0;);
impl_args!(1; A => 0);
impl_args!(2; A => 0, B => 1);
impl_args!(3; A => 0, B => 1, C => 2);
impl_args!(4; A => 0, B => 1, C => 2, D => 3);
impl_args!(5; A => 0, B => 1, C => 2, D => 3, E => 4);
impl_args!(6; A => 0, B => 1, C => 2, D => 3, E => 4, G => 5);
impl_args!(7; A => 0, B => 1, C => 2, D => 3, E => 4, G => 5, H => 6);
impl_args!(8; A => 0, B => 1, C => 2, D => 3, E => 4, G => 5, H => 6, I => 7);
