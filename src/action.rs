use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A request for a named state transition.
///
/// Serialises as `{"name": "...", "payload": [...]}`. The `payload` key is
/// left out entirely when the action carries no arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
}

impl Action {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: None,
        }
    }

    /// Builds an action from call-site arguments. No arguments means no payload.
    pub fn with_args(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            payload: Payload::new(args),
        }
    }

    /// Positional arguments, empty when there is no payload.
    pub fn args(&self) -> &[Value] {
        self.payload.as_ref().map(Payload::as_slice).unwrap_or(&[])
    }
}

/// Ordered, non-empty argument list of an [`Action`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Value>", into = "Vec<Value>")]
pub struct Payload(Vec<Value>);

impl Payload {
    pub fn new(args: Vec<Value>) -> Option<Self> {
        if args.is_empty() {
            None
        } else {
            Some(Self(args))
        }
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("action payload must not be empty")]
pub struct EmptyPayload;

impl TryFrom<Vec<Value>> for Payload {
    type Error = EmptyPayload;

    fn try_from(args: Vec<Value>) -> Result<Self, Self::Error> {
        Payload::new(args).ok_or(EmptyPayload)
    }
}

impl From<Payload> for Vec<Value> {
    fn from(payload: Payload) -> Self {
        payload.0
    }
}
