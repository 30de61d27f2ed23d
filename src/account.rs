use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::{
    error::ErrorKind,
    registry::{AccountNumber, Registry, RegistryError},
    summary::AccountSummary,
};

/// Credited on top of the starting balance of every new account.
pub const SIGNUP_BONUS: Decimal = Decimal::from_parts(4999, 0, 0, false, 2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountAction {
    Open,
    Deposit,
    Withdraw,
    Transfer,
    SetLimit,
}

impl fmt::Display for AccountAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AccountAction::Open => "Opening balance",
            AccountAction::Deposit => "Deposit amount",
            AccountAction::Withdraw => "Withdrawal amount",
            AccountAction::Transfer => "Transfer amount",
            AccountAction::SetLimit => "Transaction limit",
        })
    }
}

#[derive(Debug, PartialEq, Eq)]
enum AccountEventKind {
    Deposited,
    Withdrawn,
    TransferSent,
    TransferReceived,
}

#[derive(Debug)]
struct AccountEvent {
    amount: Decimal,
    kind: AccountEventKind,
}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("{action} must be non-negative, received {amount}")]
    NegativeAmount {
        action: AccountAction,
        amount: Decimal,
    },
    #[error("{action} rejected: account ({account}) is banned")]
    AccountBanned {
        action: AccountAction,
        account: AccountNumber,
    },
    #[error("{action} {requested} exceeds available balance {available} in account ({account})")]
    InsufficientFunds {
        action: AccountAction,
        account: AccountNumber,
        requested: Decimal,
        available: Decimal,
    },
    #[error("{action} ${amount} exceeds maximum transaction limit ${limit}")]
    LimitExceeded {
        action: AccountAction,
        amount: Decimal,
        limit: Decimal,
    },
    #[error("{action} {amount} would overflow the account balance")]
    BalanceOverflow {
        action: AccountAction,
        amount: Decimal,
    },
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl AccountError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccountError::NegativeAmount { .. } | AccountError::BalanceOverflow { .. } => {
                ErrorKind::Value
            }
            AccountError::AccountBanned { .. } => ErrorKind::Operation,
            AccountError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            AccountError::LimitExceeded { .. } => ErrorKind::Limit,
            AccountError::Registry(err) => err.kind(),
        }
    }
}

#[derive(Debug)]
pub struct Account {
    owner: String,
    balance: Decimal,
    account_number: AccountNumber,
    transaction_limit: Option<Decimal>,
}

fn check_non_negative(action: AccountAction, amount: Decimal) -> Result<(), AccountError> {
    if amount < Decimal::ZERO {
        Err(AccountError::NegativeAmount { action, amount })
    } else {
        Ok(())
    }
}

impl Account {
    /// Opens a new account, taking its number from `registry` and adding
    /// [`SIGNUP_BONUS`] to `balance`.
    pub fn open(
        registry: &mut Registry,
        owner: impl Into<String>,
        balance: Decimal,
    ) -> Result<Self, AccountError> {
        check_non_negative(AccountAction::Open, balance)?;
        let balance = balance
            .checked_add(SIGNUP_BONUS)
            .ok_or(AccountError::BalanceOverflow {
                action: AccountAction::Open,
                amount: balance,
            })?;
        let account_number = registry.issue_account_number()?;
        let account = Self {
            owner: owner.into(),
            balance,
            account_number,
            transaction_limit: None,
        };
        debug!(
            account = account_number,
            owner = %account.owner,
            balance = %account.balance,
            "account opened"
        );
        Ok(account)
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn account_number(&self) -> AccountNumber {
        self.account_number
    }

    /// `None` means unlimited.
    pub fn transaction_limit(&self) -> Option<Decimal> {
        self.transaction_limit
    }

    pub fn set_transaction_limit(&mut self, limit: Option<Decimal>) -> Result<(), AccountError> {
        if let Some(limit) = limit {
            check_non_negative(AccountAction::SetLimit, limit)?;
        }
        self.transaction_limit = limit;
        Ok(())
    }

    pub fn summary<'a>(&'a self, registry: &'a Registry) -> AccountSummary<'a> {
        AccountSummary::new(self, registry.ban_reason(self))
    }

    pub fn deposit(&mut self, registry: &Registry, amount: Decimal) -> Result<(), AccountError> {
        let evt = self.handle_deposit(registry, amount)?;
        self.apply(&evt);
        debug!(account = self.account_number, %amount, balance = %self.balance, "deposited");
        Ok(())
    }

    pub fn withdraw(&mut self, registry: &Registry, amount: Decimal) -> Result<(), AccountError> {
        let evt = self.handle_withdraw(registry, amount)?;
        self.apply(&evt);
        debug!(account = self.account_number, %amount, balance = %self.balance, "withdrawn");
        Ok(())
    }

    /// Moves `amount` from `self` to `target`.
    ///
    /// Both sides are validated before either balance changes, so a failed
    /// transfer leaves both accounts untouched.
    pub fn transfer_to(
        &mut self,
        target: &mut Account,
        registry: &Registry,
        amount: Decimal,
    ) -> Result<(), AccountError> {
        let (sent, received) = self.handle_transfer(target, registry, amount)?;
        self.apply(&sent);
        target.apply(&received);
        debug!(
            from = self.account_number,
            to = target.account_number,
            %amount,
            "transferred"
        );
        Ok(())
    }

    fn apply(&mut self, event: &AccountEvent) {
        match event.kind {
            AccountEventKind::Deposited | AccountEventKind::TransferReceived => {
                self.balance += event.amount;
            }
            AccountEventKind::Withdrawn | AccountEventKind::TransferSent => {
                self.balance -= event.amount;
            }
        }
    }

    fn ensure_not_banned(
        &self,
        registry: &Registry,
        action: AccountAction,
    ) -> Result<(), AccountError> {
        if registry.is_banned(self) {
            return Err(AccountError::AccountBanned {
                action,
                account: self.account_number,
            });
        }
        Ok(())
    }

    fn ensure_can_credit(
        &self,
        action: AccountAction,
        amount: Decimal,
    ) -> Result<(), AccountError> {
        match self.balance.checked_add(amount) {
            Some(_) => Ok(()),
            None => Err(AccountError::BalanceOverflow { action, amount }),
        }
    }

    // Balance is checked before the limit, so an over-limit withdrawal that
    // also lacks funds reports insufficient funds.
    fn ensure_can_debit(
        &self,
        action: AccountAction,
        amount: Decimal,
    ) -> Result<(), AccountError> {
        if amount > self.balance {
            return Err(AccountError::InsufficientFunds {
                action,
                account: self.account_number,
                requested: amount,
                available: self.balance,
            });
        }
        match self.transaction_limit {
            Some(limit) if amount > limit => Err(AccountError::LimitExceeded {
                action,
                amount,
                limit,
            }),
            _ => Ok(()),
        }
    }

    fn handle_deposit(
        &self,
        registry: &Registry,
        amount: Decimal,
    ) -> Result<AccountEvent, AccountError> {
        check_non_negative(AccountAction::Deposit, amount)?;
        self.ensure_not_banned(registry, AccountAction::Deposit)?;
        self.ensure_can_credit(AccountAction::Deposit, amount)?;
        Ok(AccountEvent {
            amount,
            kind: AccountEventKind::Deposited,
        })
    }

    fn handle_withdraw(
        &self,
        registry: &Registry,
        amount: Decimal,
    ) -> Result<AccountEvent, AccountError> {
        check_non_negative(AccountAction::Withdraw, amount)?;
        self.ensure_not_banned(registry, AccountAction::Withdraw)?;
        self.ensure_can_debit(AccountAction::Withdraw, amount)?;
        Ok(AccountEvent {
            amount,
            kind: AccountEventKind::Withdrawn,
        })
    }

    fn handle_transfer(
        &self,
        target: &Account,
        registry: &Registry,
        amount: Decimal,
    ) -> Result<(AccountEvent, AccountEvent), AccountError> {
        check_non_negative(AccountAction::Transfer, amount)?;
        self.ensure_not_banned(registry, AccountAction::Transfer)?;
        target.ensure_not_banned(registry, AccountAction::Transfer)?;
        self.ensure_can_debit(AccountAction::Transfer, amount)?;
        target.ensure_can_credit(AccountAction::Transfer, amount)?;
        Ok((
            AccountEvent {
                amount,
                kind: AccountEventKind::TransferSent,
            },
            AccountEvent {
                amount,
                kind: AccountEventKind::TransferReceived,
            },
        ))
    }
}
