use std::fmt;

/// A positional argument could not be moved between its Rust type and the
/// action payload.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("argument {index} of `{name}` could not be decoded: {source}")]
    Decode {
        name: String,
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("argument {index} of `{name}` could not be encoded: {source}")]
    Encode {
        name: String,
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl PayloadError {
    pub fn name(&self) -> &str {
        match self {
            Self::Decode { name, .. } | Self::Encode { name, .. } => name,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Decode { index, .. } | Self::Encode { index, .. } => *index,
        }
    }
}

/// A state root was created outside a tokio runtime.
#[derive(Debug, thiserror::Error)]
#[error("a state root must be created inside a tokio runtime")]
pub struct NoRuntime;

/// An action the reducer refused to apply. Carries the untouched state back.
pub struct Rejected<S> {
    pub state: S,
    pub error: PayloadError,
}

impl<S> Rejected<S> {
    pub fn into_state(self) -> S {
        self.state
    }
}

impl<S> fmt::Debug for Rejected<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rejected")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<S> fmt::Display for Rejected<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "action rejected: {}", self.error)
    }
}

impl<S> std::error::Error for Rejected<S> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
