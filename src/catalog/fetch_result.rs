use std::sync::Arc;

/// Outcome of a single remote lookup.
///
/// The fetch layer never raises past its boundary: a network failure, a
/// non-success HTTP status, and a malformed body all collapse into a
/// non-`Found` variant, and the caller's fallback chain takes over. The
/// aggregation makes no behavioral distinction between `NotFound` and
/// `Error`; the split exists so call sites can log them differently.
#[derive(Debug, Clone)]
pub enum FetchResult<T> {
    /// The request succeeded and data was found.
    Found(T),

    /// The resource does not exist upstream. For release lookups this is an
    /// expected state, not a failure.
    NotFound,

    /// The request failed: network error, HTTP error status, or unparseable
    /// body.
    Error(Arc<ohno::AppError>),
}

impl<T> FetchResult<T> {
    /// Returns `true` if the result is `Found`.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Converts this result into an `Option`, returning `Some` only for `Found`.
    #[must_use]
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Found(data) => Some(data),
            Self::NotFound | Self::Error(_) => None,
        }
    }

    /// Returns a string describing the status of this result.
    #[must_use]
    pub const fn status_str(&self) -> &'static str {
        match self {
            Self::Found(_) => "Found",
            Self::NotFound => "NotFound",
            Self::Error(_) => "Error",
        }
    }
}
