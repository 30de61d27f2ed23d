use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::{error::ErrorKind, registry::AccountNumber};

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Open,
    Deposit,
    Withdraw,
    Transfer,
    Ban,
    UnbanAll,
    Limit,
    NextNumber,
}

/// Untyped command as it appears in a script, every field still text.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandRecord {
    #[serde(rename = "type")]
    pub kind: CommandKind,
    pub account: Option<String>,
    pub target: Option<String>,
    pub amount: Option<String>,
    pub text: Option<String>,
}

impl CommandRecord {
    pub fn new(kind: CommandKind) -> Self {
        Self {
            kind,
            account: None,
            target: None,
            amount: None,
            text: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankCommand {
    Open {
        owner: String,
        balance: Decimal,
    },
    Deposit {
        account: AccountNumber,
        amount: Decimal,
    },
    Withdraw {
        account: AccountNumber,
        amount: Decimal,
    },
    Transfer {
        from: AccountNumber,
        to: AccountNumber,
        amount: Decimal,
    },
    Ban {
        account: AccountNumber,
        reason: String,
    },
    UnbanAll,
    SetLimit {
        account: AccountNumber,
        limit: Option<Decimal>,
    },
    SetNextAccountNumber {
        next: AccountNumber,
    },
}

#[derive(Debug, Error)]
pub enum AccountCommandError {
    #[error("Field `{field}` is required for {kind:?}")]
    MissingField {
        kind: CommandKind,
        field: &'static str,
    },
    #[error("Field `{field}` must be a number, received `{value}`")]
    NotANumber { field: &'static str, value: String },
    #[error("Field `{field}` must be an integer, received `{value}`")]
    NotAnInteger { field: &'static str, value: String },
    #[error("Field `{field}` is not a valid account number, received {value}")]
    AccountNumberOutOfRange { field: &'static str, value: i128 },
}

impl AccountCommandError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccountCommandError::MissingField { .. }
            | AccountCommandError::NotANumber { .. }
            | AccountCommandError::NotAnInteger { .. } => ErrorKind::Type,
            AccountCommandError::AccountNumberOutOfRange { .. } => ErrorKind::Value,
        }
    }
}

fn required<'a>(
    kind: CommandKind,
    field: &'static str,
    value: &'a Option<String>,
) -> Result<&'a str, AccountCommandError> {
    value
        .as_deref()
        .ok_or(AccountCommandError::MissingField { kind, field })
}

fn parse_amount(field: &'static str, value: &str) -> Result<Decimal, AccountCommandError> {
    Decimal::from_str(value).map_err(|_| AccountCommandError::NotANumber {
        field,
        value: value.to_string(),
    })
}

fn parse_account_number(
    field: &'static str,
    value: &str,
) -> Result<AccountNumber, AccountCommandError> {
    let number: i128 = value.parse().map_err(|_| AccountCommandError::NotAnInteger {
        field,
        value: value.to_string(),
    })?;
    AccountNumber::try_from(number)
        .map_err(|_| AccountCommandError::AccountNumberOutOfRange { field, value: number })
}

impl BankCommand {
    pub fn parse(record: &CommandRecord) -> Result<Self, AccountCommandError> {
        let kind = record.kind;
        let account = || -> Result<AccountNumber, AccountCommandError> {
            parse_account_number("account", required(kind, "account", &record.account)?)
        };
        let amount = || -> Result<Decimal, AccountCommandError> {
            parse_amount("amount", required(kind, "amount", &record.amount)?)
        };
        let text = || record.text.clone().unwrap_or_default();

        match kind {
            CommandKind::Open => Ok(Self::Open {
                owner: text(),
                balance: amount()?,
            }),
            CommandKind::Deposit => Ok(Self::Deposit {
                account: account()?,
                amount: amount()?,
            }),
            CommandKind::Withdraw => Ok(Self::Withdraw {
                account: account()?,
                amount: amount()?,
            }),
            CommandKind::Transfer => Ok(Self::Transfer {
                from: account()?,
                to: parse_account_number("target", required(kind, "target", &record.target)?)?,
                amount: amount()?,
            }),
            CommandKind::Ban => Ok(Self::Ban {
                account: account()?,
                reason: text(),
            }),
            CommandKind::UnbanAll => Ok(Self::UnbanAll),
            CommandKind::Limit => Ok(Self::SetLimit {
                account: account()?,
                // blank amount clears the limit
                limit: record
                    .amount
                    .as_deref()
                    .map(|value| parse_amount("amount", value))
                    .transpose()?,
            }),
            CommandKind::NextNumber => Ok(Self::SetNextAccountNumber { next: account()? }),
        }
    }
}
