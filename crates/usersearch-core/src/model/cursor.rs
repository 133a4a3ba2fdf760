use serde::{Deserialize, Serialize};

/// ## Summary
/// Opaque pagination token issued by the index.
///
/// Clients pass it back verbatim; the empty token means the result set is
/// exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchCursor(String);

impl SearchCursor {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The exhaustion sentinel.
    #[must_use]
    pub fn exhausted() -> Self {
        Self(String::new())
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Interprets an optional request parameter: absent or blank means
    /// "start from the first page".
    #[must_use]
    pub fn from_param(param: Option<&str>) -> Option<Self> {
        param
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(Self::new)
    }
}

impl std::fmt::Display for SearchCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
