use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::{account::Account, error::ErrorKind};

pub type AccountNumber = u32;

pub const DEFAULT_FIRST_ACCOUNT_NUMBER: AccountNumber = 1045;

#[derive(Debug, Clone, Copy)]
pub struct RegistryConfig {
    /// First number handed out, and the lowest value the counter may be reset to.
    pub first_account_number: AccountNumber,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            first_account_number: DEFAULT_FIRST_ACCOUNT_NUMBER,
        }
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Account numbers start from {floor}, received {requested}")]
    BelowFloor {
        requested: AccountNumber,
        floor: AccountNumber,
    },
    #[error("Account ({account}) has already been banned")]
    AlreadyBanned { account: AccountNumber },
    #[error("No account numbers left to issue")]
    NumbersExhausted,
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::BelowFloor { .. } => ErrorKind::Value,
            RegistryError::AlreadyBanned { .. } | RegistryError::NumbersExhausted => {
                ErrorKind::Operation
            }
        }
    }
}

/// Account numbering sequence and ban list.
///
/// Every account operation that depends on ban state takes the registry by
/// reference, so two registries never share bans or numbers.
#[derive(Debug)]
pub struct Registry {
    floor: AccountNumber,
    next_account_number: Option<AccountNumber>,
    banned_accounts: HashMap<AccountNumber, String>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl Registry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            floor: config.first_account_number,
            next_account_number: Some(config.first_account_number),
            banned_accounts: HashMap::new(),
        }
    }

    /// Number the next opened account will receive, `None` once `u32` is used up.
    pub fn next_account_number(&self) -> Option<AccountNumber> {
        self.next_account_number
    }

    pub fn set_next_account_number(&mut self, next: AccountNumber) -> Result<(), RegistryError> {
        if next < self.floor {
            return Err(RegistryError::BelowFloor {
                requested: next,
                floor: self.floor,
            });
        }
        debug!(next, "account number counter overridden");
        self.next_account_number = Some(next);
        Ok(())
    }

    /// Hands out the current counter value and advances it by one.
    pub(crate) fn issue_account_number(&mut self) -> Result<AccountNumber, RegistryError> {
        let issued = self
            .next_account_number
            .ok_or(RegistryError::NumbersExhausted)?;
        self.next_account_number = issued.checked_add(1);
        Ok(issued)
    }

    pub fn ban_account(
        &mut self,
        account: &Account,
        reason: impl Into<String>,
    ) -> Result<(), RegistryError> {
        let number = account.account_number();
        if self.banned_accounts.contains_key(&number) {
            return Err(RegistryError::AlreadyBanned { account: number });
        }
        let reason = reason.into();
        debug!(account = number, reason = %reason, "account banned");
        self.banned_accounts.insert(number, reason);
        Ok(())
    }

    /// Lifts every ban in the registry, not just the ones of a single account.
    pub fn unban_all(&mut self) {
        debug!(count = self.banned_accounts.len(), "all bans lifted");
        self.banned_accounts.clear();
    }

    pub fn is_banned(&self, account: &Account) -> bool {
        self.banned_accounts.contains_key(&account.account_number())
    }

    pub fn ban_reason(&self, account: &Account) -> Option<&str> {
        self.banned_accounts
            .get(&account.account_number())
            .map(String::as_str)
    }

    pub fn banned_count(&self) -> usize {
        self.banned_accounts.len()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn issues_sequential_numbers_from_floor() {
        let mut registry = Registry::default();
        assert_eq!(registry.next_account_number(), Some(1045));
        let first = Account::open(&mut registry, "Tom Cruise", Decimal::from(1000)).unwrap();
        let second = Account::open(&mut registry, "Glen Powell", Decimal::ZERO).unwrap();
        assert_eq!(first.account_number(), 1045);
        assert_eq!(second.account_number(), 1046);
        assert_eq!(registry.next_account_number(), Some(1047));
    }

    #[test]
    fn custom_floor() {
        let mut registry = Registry::new(RegistryConfig {
            first_account_number: 1,
        });
        let acc = Account::open(&mut registry, "", Decimal::ZERO).unwrap();
        assert_eq!(acc.account_number(), 1);
        registry.set_next_account_number(1).unwrap();
        let err = registry.set_next_account_number(0).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::BelowFloor {
                requested: 0,
                floor: 1
            }
        ));
    }

    #[test]
    fn override_counter() {
        let mut registry = Registry::default();
        let err = registry.set_next_account_number(1044).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        assert_eq!(
            err.to_string(),
            "Account numbers start from 1045, received 1044"
        );
        // failed override leaves counter intact
        assert_eq!(registry.next_account_number(), Some(1045));

        registry.set_next_account_number(2000).unwrap();
        let acc = Account::open(&mut registry, "Rupert", Decimal::from(50)).unwrap();
        assert_eq!(acc.account_number(), 2000);

        // going backwards is allowed as long as it stays above the floor
        registry.set_next_account_number(1045).unwrap();
        assert_eq!(registry.next_account_number(), Some(1045));
    }

    #[test]
    fn counter_exhaustion() {
        let mut registry = Registry::default();
        registry.set_next_account_number(AccountNumber::MAX).unwrap();
        let last = Account::open(&mut registry, "last", Decimal::ZERO).unwrap();
        assert_eq!(last.account_number(), AccountNumber::MAX);
        assert_eq!(registry.next_account_number(), None);

        let err = registry.issue_account_number().unwrap_err();
        assert!(matches!(err, RegistryError::NumbersExhausted));
        assert_eq!(err.kind(), ErrorKind::Operation);
    }

    #[test]
    fn ban_and_unban() {
        let mut registry = Registry::default();
        let acc = Account::open(&mut registry, "Tom Cruise", Decimal::from(1000)).unwrap();
        let other = Account::open(&mut registry, "Glen Powell", Decimal::from(10)).unwrap();
        assert!(!registry.is_banned(&acc));
        assert_eq!(registry.ban_reason(&acc), None);

        registry.ban_account(&acc, "Suspicious activity").unwrap();
        assert!(registry.is_banned(&acc));
        assert!(!registry.is_banned(&other));
        assert_eq!(registry.ban_reason(&acc), Some("Suspicious activity"));

        let err = registry.ban_account(&acc, "again").unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyBanned { account: 1045 }));
        assert_eq!(err.kind(), ErrorKind::Operation);
        // original reason kept
        assert_eq!(registry.ban_reason(&acc), Some("Suspicious activity"));

        registry.ban_account(&other, "").unwrap();
        assert_eq!(registry.banned_count(), 2);
        assert_eq!(registry.ban_reason(&other), Some(""));

        registry.unban_all();
        assert_eq!(registry.banned_count(), 0);
        registry.unban_all();
        assert_eq!(registry.banned_count(), 0);
        assert!(!registry.is_banned(&acc));
        assert!(!registry.is_banned(&other));
    }
}
