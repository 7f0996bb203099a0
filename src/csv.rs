use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::amount::AmountError;
use crate::inventory::StockLine;
use crate::{Amount, Command};

/// Errors that can occur when parsing csv rows
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to open session file: {0}")]
    Open(csv::Error),

    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: unrecognized operation '{op}'")]
    UnrecognizedOp { line: usize, op: String },

    #[error("line {line}: {op} missing {field}")]
    MissingField {
        line: usize,
        op: String,
        field: &'static str,
    },

    #[error("line {line}: {source}")]
    Amount { line: usize, source: AmountError },
}

#[derive(Debug, Deserialize)]
struct InputRow {
    op: String,
    code: Option<String>,
    name: Option<String>,
    amount: Option<String>,
    quantity: Option<u32>,
}

#[derive(Debug, Serialize)]
struct OutputRow<'a> {
    code: &'a str,
    name: &'a str,
    price: String,
    stock: u32,
}

impl InputRow {
    fn require<T>(
        value: Option<T>,
        line: usize,
        op: &str,
        field: &'static str,
    ) -> Result<T, CsvError> {
        value.ok_or_else(|| CsvError::MissingField {
            line,
            op: op.to_string(),
            field,
        })
    }

    fn amount(&mut self, line: usize) -> Result<Amount, CsvError> {
        let raw = Self::require(self.amount.take(), line, &self.op, "amount")?;
        raw.parse().map_err(|source| CsvError::Amount { line, source })
    }

    fn into_command(mut self, line: usize) -> Result<Command, CsvError> {
        match self.op.as_str() {
            "stock" => {
                let price = self.amount(line)?;
                Ok(Command::Stock {
                    code: Self::require(self.code, line, &self.op, "code")?,
                    name: Self::require(self.name, line, &self.op, "name")?,
                    price,
                    quantity: Self::require(self.quantity, line, &self.op, "quantity")?,
                })
            }
            "insert" => Ok(Command::InsertMoney {
                amount: self.amount(line)?,
            }),
            "select" => Ok(Command::SelectProduct {
                code: Self::require(self.code, line, &self.op, "code")?,
            }),
            "cancel" => Ok(Command::Cancel),
            other => Err(CsvError::UnrecognizedOp {
                line,
                op: other.to_string(),
            }),
        }
    }
}

/// Read commands from a session csv file
pub fn read_commands(
    path: impl AsRef<Path>,
) -> Result<impl Iterator<Item = Result<Command, CsvError>>, CsvError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(CsvError::Open)?;

    Ok(reader
        .into_deserialize::<InputRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            row.into_command(line)
        }))
}

/// Write an inventory snapshot in csv format
pub fn write_stock<'a>(
    writer: impl io::Write,
    lines: impl IntoIterator<Item = &'a StockLine>,
) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);

    for line in lines {
        writer.serialize(OutputRow {
            code: line.entry.code(),
            name: line.entry.name(),
            price: line.entry.price().to_string(),
            stock: line.count,
        })?;
    }

    writer.flush()?;
    Ok(())
}
