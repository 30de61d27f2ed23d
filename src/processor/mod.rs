use thiserror::Error;

use crate::{
    account::AccountError,
    command::{AccountCommandError, BankCommand},
    error::ErrorKind,
    registry::{AccountNumber, RegistryError},
};

pub mod in_memory_processor;

#[derive(Debug, Error)]
pub enum TransactionProcessError {
    #[error(transparent)]
    CommandErr(#[from] AccountCommandError),
    #[error(transparent)]
    AccountErr(#[from] AccountError),
    #[error(transparent)]
    RegistryErr(#[from] RegistryError),
    #[error("Account ({account}) does not exist")]
    UnknownAccount { account: AccountNumber },
    #[error("Sender and receiver accounts must be different, both are ({account})")]
    SameAccount { account: AccountNumber },
    #[error("Account ({account}) is already open")]
    DuplicateAccount { account: AccountNumber },
}

impl TransactionProcessError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransactionProcessError::CommandErr(err) => err.kind(),
            TransactionProcessError::AccountErr(err) => err.kind(),
            TransactionProcessError::RegistryErr(err) => err.kind(),
            TransactionProcessError::UnknownAccount { .. } => ErrorKind::Type,
            TransactionProcessError::SameAccount { .. } => ErrorKind::Value,
            TransactionProcessError::DuplicateAccount { .. } => ErrorKind::Operation,
        }
    }
}

pub trait TransactionProcessor {
    fn process_command(&mut self, command: BankCommand) -> Result<(), TransactionProcessError>;
}
