//! Stream identifiers: the atomic named references the rest of the crate
//! builds on.

use smol_str::SmolStr;
use std::fmt;

/// A named symbolic reference to a value produced externally (an input) or
/// by a bound expression (an output).
///
/// Two streams are equal, and hash identically, iff their names are equal.
/// `Stream` is a small value type backed by [`SmolStr`] so that cloning one
/// — which every geometry builder and every [`crate::Expression`] append
/// does routinely — never allocates for short names and is cheap even for
/// long ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Stream {
    name: SmolStr,
}

impl Stream {
    /// Creates a stream with the given name.
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the stream's name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl From<&str> for Stream {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Stream {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<SmolStr> for Stream {
    fn from(name: SmolStr) -> Self {
        Self::new(name)
    }
}

impl AsRef<str> for Stream {
    fn as_ref(&self) -> &str {
        &self.name
    }
}
