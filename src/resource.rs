//! Load state pushed to observers of the task list

use crate::error::ErrorInfo;

/// Latest state of an observed value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Resource<T> {
    /// Nothing has been read yet.
    #[default]
    Loading,
    Success(T),
    /// The last read failed. `stale` is the value observers were showing before,
    /// if any, so they can keep showing it next to the error.
    Error { error: ErrorInfo, stale: Option<T> },
}

impl<T> Resource<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Resource::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Resource::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Resource::Error { .. })
    }

    /// Fresh data only.
    pub fn data(&self) -> Option<&T> {
        match self {
            Resource::Success(data) => Some(data),
            _ => None,
        }
    }

    /// Fresh data, or the stale value kept alongside an error.
    pub fn last_known(&self) -> Option<&T> {
        match self {
            Resource::Success(data) => Some(data),
            Resource::Error { stale, .. } => stale.as_ref(),
            Resource::Loading => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        match self {
            Resource::Error { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Replace `self` with a failure, keeping whatever data was last known.
    pub fn fail(self, error: ErrorInfo) -> Self {
        let stale = match self {
            Resource::Success(data) => Some(data),
            Resource::Error { stale, .. } => stale,
            Resource::Loading => None,
        };
        Resource::Error { error, stale }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resource<U> {
        match self {
            Resource::Loading => Resource::Loading,
            Resource::Success(data) => Resource::Success(f(data)),
            Resource::Error { error, stale } => Resource::Error {
                error,
                stale: stale.map(f),
            },
        }
    }
}
