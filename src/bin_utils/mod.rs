//! Drives an [`InMemoryBank`] from a CSV command script and prints the
//! resulting accounts. Used by the integration tests.

use std::io::{Read, Write};

use crate::{
    command::BankCommand,
    processor::{
        TransactionProcessError, TransactionProcessor, in_memory_processor::InMemoryBank,
    },
    registry::Registry,
};
use anyhow::{Context, Result};
use csv_parser::CsvCommandParser;
use csv_printer::{AccountRow, print_accounts};
pub mod csv_parser;
pub mod csv_printer;

pub struct Service<'w, R, W: 'w> {
    pub input: R,
    pub output: &'w mut W,
    pub error_printer: Box<dyn FnMut(u64, TransactionProcessError)>,
}

impl<'w, R, W> Service<'w, R, W>
where
    R: Read,
    W: Write + 'w,
{
    pub fn run(self) -> Result<()> {
        self.run_with(Registry::default())
    }

    /// Runs the script against `registry`, e.g. one with a custom first account number.
    pub fn run_with(mut self, registry: Registry) -> Result<()> {
        let parser = CsvCommandParser::new(self.input);

        let mut bank = InMemoryBank::new(registry);

        for (line, row) in parser {
            let record = row.with_context(|| format!("Malformed command at line {line}"))?;
            let result = BankCommand::parse(&record)
                .map_err(TransactionProcessError::from)
                .and_then(|command| bank.process_command(command));
            if let Err(err) = result {
                (self.error_printer)(line, err);
            }
        }

        let registry = &bank.registry;
        print_accounts(
            self.output,
            bank.accounts.values().map(|acc| AccountRow {
                account: acc.account_number(),
                owner: acc.owner().to_string(),
                balance: acc.balance(),
                limit: acc.transaction_limit(),
                banned: registry.is_banned(acc),
                ban_reason: registry.ban_reason(acc).map(ToOwned::to_owned),
            }),
        )
    }
}
