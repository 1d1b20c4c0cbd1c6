//! Structural self-check failures.
//!
//! The container APIs themselves are infallible: absence is an `Option`, and
//! out-of-range capacities are clamped rather than rejected. The single error
//! type here, [`InvariantError`], backs the debug-only `check_invariants`
//! methods so tests can interrogate a structure after a suspect operation
//! sequence instead of asserting deep inside library code.
//!
//! ```
//! use orderkit::map::OrderedMap;
//!
//! let mut map: OrderedMap<u32, &str> = OrderedMap::new();
//! map.insert(1, "one");
//! map.insert(2, "two");
//! assert!(map.check_invariants().is_ok());
//! ```

use std::fmt;

/// A broken structural invariant, described in plain text.
///
/// Returned by the debug-only `check_invariants` methods (e.g.
/// [`OrderedMap::check_invariants`](crate::map::OrderedMap::check_invariants));
/// the message names the first violated property found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// The violated-property description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}
