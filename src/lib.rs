/// Account entity: opening, deposits, withdrawals, transfers and limits.
/// Balance changes are validated into events first and applied afterwards.
pub mod account;

/// Account numbering sequence and ban list, owned by the caller and passed
/// to every [`account`] operation that needs it.
pub mod registry;

/// Error classification shared by every module.
pub mod error;

/// Human readable account summary.
pub mod summary;

/// Turns untyped command fields into typed commands executed by [`processor`].
pub mod command;

/// Command processor interface, plus "in memory" implementation owning a
/// registry and its accounts.
pub mod processor;

/// CSV script runner on top of [`processor`]. Kept in the library so the
/// integration tests can drive it.
pub mod bin_utils;
