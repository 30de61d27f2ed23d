/// Coarse classification shared by every error in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Argument is not of the expected type, e.g. text where a number was expected.
    Type,
    /// Argument has the right type but is out of range.
    Value,
    /// Operation is not allowed in the current account/registry state.
    Operation,
    /// Amount exceeds the configured transaction limit.
    Limit,
    /// Not enough balance to cover a withdrawal or transfer.
    InsufficientFunds,
}
