use std::io::Read;

use crate::command::CommandRecord;
use csv::{DeserializeRecordsIntoIter, Trim};

/// Parses a command script in CSV format
///
/// Header: `type,account,target,amount,text`. Empty cells become `None`.
pub struct CsvCommandParser<R> {
    iter: DeserializeRecordsIntoIter<R, CommandRecord>,
}

impl<R> CsvCommandParser<R>
where
    R: Read,
{
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(source);

        Self {
            iter: reader.into_deserialize(),
        }
    }
}

impl<R> Iterator for CsvCommandParser<R>
where
    R: Read,
{
    type Item = (u64, csv::Result<CommandRecord>);

    fn next(&mut self) -> Option<Self::Item> {
        let curr_line = self.iter.reader().position().line();
        self.iter.next().map(|row| (curr_line, row))
    }
}

#[cfg(test)]
mod tests {
    use crate::command::CommandKind;

    use super::*;

    #[test]
    fn parse_rows() {
        let script = "type, account, target, amount, text\n\
                      open, , , 1000, Tom Cruise\n\
                      unban_all\n\
                      limit, 1045, , ,\n\
                      bogus, 1\n";
        let rows: Vec<_> = CsvCommandParser::new(script.as_bytes()).collect();
        assert_eq!(rows.len(), 4);

        let (_, open) = &rows[0];
        let open = open.as_ref().unwrap();
        assert_eq!(open.kind, CommandKind::Open);
        assert_eq!(open.account, None);
        assert_eq!(open.amount.as_deref(), Some("1000"));
        assert_eq!(open.text.as_deref(), Some("Tom Cruise"));

        let (_, unban) = &rows[1];
        assert_eq!(unban.as_ref().unwrap().kind, CommandKind::UnbanAll);

        let (_, limit) = &rows[2];
        let limit = limit.as_ref().unwrap();
        assert_eq!(limit.kind, CommandKind::Limit);
        assert_eq!(limit.account.as_deref(), Some("1045"));
        assert_eq!(limit.amount, None);

        let (_, bogus) = &rows[3];
        assert!(bogus.is_err());
    }
}
