use std::collections::BTreeMap;

use tracing::warn;

use crate::{
    account::Account,
    command::BankCommand,
    registry::{AccountNumber, Registry},
};

use super::{TransactionProcessError, TransactionProcessor};

/// Owns a registry and every account opened through it.
#[derive(Debug, Default)]
pub struct InMemoryBank {
    pub registry: Registry,
    pub accounts: BTreeMap<AccountNumber, Account>,
}

// Takes the map rather than `&mut self` so the registry stays borrowable.
fn account_mut(
    accounts: &mut BTreeMap<AccountNumber, Account>,
    account: AccountNumber,
) -> Result<&mut Account, TransactionProcessError> {
    accounts
        .get_mut(&account)
        .ok_or(TransactionProcessError::UnknownAccount { account })
}

impl InMemoryBank {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            accounts: BTreeMap::new(),
        }
    }

    fn execute(&mut self, command: BankCommand) -> Result<(), TransactionProcessError> {
        match command {
            BankCommand::Open { owner, balance } => {
                if let Some(next) = self.registry.next_account_number() {
                    if self.accounts.contains_key(&next) {
                        return Err(TransactionProcessError::DuplicateAccount { account: next });
                    }
                }
                let acc = Account::open(&mut self.registry, owner, balance)?;
                self.accounts.insert(acc.account_number(), acc);
            }
            BankCommand::Deposit { account, amount } => {
                account_mut(&mut self.accounts, account)?.deposit(&self.registry, amount)?;
            }
            BankCommand::Withdraw { account, amount } => {
                account_mut(&mut self.accounts, account)?.withdraw(&self.registry, amount)?;
            }
            BankCommand::Transfer { from, to, amount } => {
                if from == to {
                    return Err(TransactionProcessError::SameAccount { account: from });
                }
                let mut source = self
                    .accounts
                    .remove(&from)
                    .ok_or(TransactionProcessError::UnknownAccount { account: from })?;
                let res = match self.accounts.get_mut(&to) {
                    Some(target) => source
                        .transfer_to(target, &self.registry, amount)
                        .map_err(TransactionProcessError::from),
                    None => Err(TransactionProcessError::UnknownAccount { account: to }),
                };
                // put the source back regardless of the outcome
                self.accounts.insert(from, source);
                res?;
            }
            BankCommand::Ban { account, reason } => {
                let acc = self
                    .accounts
                    .get(&account)
                    .ok_or(TransactionProcessError::UnknownAccount { account })?;
                self.registry.ban_account(acc, reason)?;
            }
            BankCommand::UnbanAll => self.registry.unban_all(),
            BankCommand::SetLimit { account, limit } => {
                account_mut(&mut self.accounts, account)?.set_transaction_limit(limit)?;
            }
            BankCommand::SetNextAccountNumber { next } => {
                self.registry.set_next_account_number(next)?;
            }
        }
        Ok(())
    }
}

impl TransactionProcessor for InMemoryBank {
    fn process_command(&mut self, command: BankCommand) -> Result<(), TransactionProcessError> {
        let description = format!("{command:?}");
        self.execute(command).inspect_err(|err| {
            warn!(command = %description, error = %err, "command rejected");
        })
    }
}
