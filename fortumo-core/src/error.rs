//! Error categories shared by the validator and the catalog loader.

/// Coarse classification of a failure, used by callers to decide how to
/// respond (for example which HTTP status to return).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The service itself is not configured well enough to answer.
    Configuration,
    /// The input is missing required fields or cannot be parsed.
    MalformedInput,
    /// The input is well formed but not from a trusted party.
    Trust,
    /// The vendor reported a failure in an otherwise valid document.
    Semantic,
}
