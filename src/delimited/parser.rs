use std::mem;

use crate::models::dataset::{Dataset, Record};

/// Header used for empty header cells.
pub const PLACEHOLDER_COLUMN: &str = "column";

/// Parses comma separated text into a dataset.
///
/// The first record is the header. Quoted fields may hold commas, line
/// breaks and doubled quotes. Carriage returns outside quotes are dropped,
/// short rows are padded with empty strings and surplus fields are ignored.
/// Malformed input never fails; an unterminated quote simply swallows the
/// rest of the text into the last field.
pub fn parse_csv(text: &str) -> Dataset {
    let mut records = split_records(text).into_iter();

    let header = match records.next() {
        Some(header) => header,
        None => return Dataset::default(),
    };

    let columns: Vec<String> = header
        .into_iter()
        .map(|name| {
            if name.is_empty() {
                PLACEHOLDER_COLUMN.to_string()
            } else {
                name
            }
        })
        .collect();

    let rows = records
        .map(|fields| to_record(&columns, fields))
        .collect();

    Dataset { columns, rows }
}

fn split_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => record.push(mem::take(&mut field)),
            '\n' => {
                record.push(mem::take(&mut field));
                records.push(mem::take(&mut record));
            }
            '\r' => {}
            _ => field.push(c),
        }
    }

    // No trailing newline.
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    records
}

fn to_record(columns: &[String], fields: Vec<String>) -> Record {
    let mut fields = fields.into_iter();
    let mut record = Record::with_capacity(columns.len());
    for column in columns {
        // A repeated header keeps its first position and takes the later value.
        record.insert(column.clone(), fields.next().unwrap_or_default());
    }
    record
}
