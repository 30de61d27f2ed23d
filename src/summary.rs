use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::account::Account;

/// Formats `amount` with two decimals and comma-grouped thousands, e.g. `1,049.99`.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    let digits = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut out = String::with_capacity(digits.len() + int_part.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.push('.');
    out.push_str(frac_part);
    out
}

/// One-line human readable view of an account together with its ban state.
pub struct AccountSummary<'a> {
    account: &'a Account,
    ban_reason: Option<&'a str>,
}

impl<'a> AccountSummary<'a> {
    pub(crate) fn new(account: &'a Account, ban_reason: Option<&'a str>) -> Self {
        Self {
            account,
            ban_reason,
        }
    }
}

impl fmt::Display for AccountSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let limit = match self.account.transaction_limit() {
            Some(limit) => format_amount(limit),
            None => "N/A".to_string(),
        };
        write!(
            f,
            "{}'s account ({}): Balance=${} | Limit=${} | Banned=",
            self.account.owner(),
            self.account.account_number(),
            format_amount(self.account.balance()),
            limit,
        )?;
        match self.ban_reason {
            Some(reason) => write!(f, "Yes | Ban Reason: {reason}"),
            None => f.write_str("No"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::registry::Registry;

    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn amount_formatting() {
        assert_eq!(format_amount(Decimal::ZERO), "0.00");
        assert_eq!(format_amount(dec("49.99")), "49.99");
        assert_eq!(format_amount(dec("999.999")), "1,000.00");
        assert_eq!(format_amount(dec("1049.99")), "1,049.99");
        assert_eq!(format_amount(dec("1234567.5")), "1,234,567.50");
        assert_eq!(format_amount(dec("100000")), "100,000.00");
        assert_eq!(format_amount(dec("0.125")), "0.12");
        assert_eq!(format_amount(dec("-1234.5")), "-1,234.50");
    }

    #[test]
    fn summary_line() {
        let mut registry = Registry::default();
        let mut acc = Account::open(&mut registry, "Tom Cruise", Decimal::from(1000)).unwrap();
        assert_eq!(
            acc.summary(&registry).to_string(),
            "Tom Cruise's account (1045): Balance=$1,049.99 | Limit=$N/A | Banned=No"
        );

        acc.set_transaction_limit(Some(Decimal::from(2500))).unwrap();
        registry.ban_account(&acc, "Chargeback abuse").unwrap();
        assert_eq!(
            acc.summary(&registry).to_string(),
            "Tom Cruise's account (1045): Balance=$1,049.99 | Limit=$2,500.00 | Banned=Yes | Ban Reason: Chargeback abuse"
        );

        registry.unban_all();
        registry.ban_account(&acc, "").unwrap();
        assert_eq!(
            acc.summary(&registry).to_string(),
            "Tom Cruise's account (1045): Balance=$1,049.99 | Limit=$2,500.00 | Banned=Yes | Ban Reason: "
        );
    }
}
