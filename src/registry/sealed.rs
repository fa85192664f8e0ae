// ABOUTME: Sealed trait pattern for the registry and builder capabilities.
// ABOUTME: Prevents external implementations, allowing non-breaking evolution.

/// Sealed trait to prevent external implementations.
///
/// Only the engine adapters and in-memory fakes in this crate implement the
/// capability traits.
pub trait Sealed {}
