//! `csv-upload` command: upload a CSV file as a tabular variable.

use std::fs;

use serde_json::{Map, Value};

use crate::cli::context::CommandContext;
use crate::cli::dispatch::Services;
use crate::core::models::{Generator, NewGenerator};
use crate::error::{RainforestError, Result};

/// Rows sent per batch request.
pub const BATCH_SIZE: usize = 100;

/// Execute the csv-upload command.
///
/// # Errors
///
/// Returns `InvalidArgument` for missing options, `Csv` for malformed input,
/// `AlreadyExists` if the variable exists and `--overwrite-variable` is not
/// set, or the first API error.
pub async fn execute(ctx: &dyn CommandContext, services: &Services) -> Result<String> {
    let csv_file = ctx
        .string_option("csv_file")
        .ok_or_else(|| RainforestError::InvalidArgument("--csv-file is required".to_string()))?;
    let name = ctx
        .string_option("import_variable_name")
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| {
            RainforestError::InvalidArgument("--import-variable-name is required".to_string())
        })?;
    let overwrite = ctx.bool_option("overwrite_variable");

    let content = fs::read_to_string(&csv_file)?;
    let mut records = parse_csv(&content)?.into_iter();
    let columns = records
        .next()
        .ok_or_else(|| RainforestError::Csv {
            line: 1,
            message: "file is empty".to_string(),
        })?;
    let rows: Vec<Vec<String>> = records.collect();

    let api = services.api()?;
    if let Some(existing) = api.generators().await?.into_iter().find(|g| g.name == name) {
        if !overwrite {
            return Err(RainforestError::AlreadyExists(format!(
                "tabular variable \"{name}\" (use --overwrite-variable to replace it)"
            )));
        }
        api.delete_generator(existing.id).await?;
        tracing::info!(name = %name, id = existing.id, "deleted existing tabular variable");
    }

    let generator = api
        .create_generator(&NewGenerator {
            name: name.clone(),
            description: name.clone(),
            columns: columns.clone(),
        })
        .await?;
    let column_ids = column_ids(&generator, &columns)?;

    let payload: Vec<Map<String, Value>> = rows
        .iter()
        .map(|row| {
            column_ids
                .iter()
                .zip(row)
                .map(|(id, value)| (id.to_string(), Value::String(value.clone())))
                .collect()
        })
        .collect();

    for (index, batch) in payload.chunks(BATCH_SIZE).enumerate() {
        api.batch_rows(generator.id, batch).await?;
        tracing::debug!(batch = index + 1, rows = batch.len(), "uploaded rows");
    }

    Ok(format!(
        "Uploaded {} rows to tabular variable \"{name}\"\n",
        rows.len()
    ))
}

/// Column ids of `generator`, in the order of `columns`.
fn column_ids(generator: &Generator, columns: &[String]) -> Result<Vec<i64>> {
    columns
        .iter()
        .map(|name| {
            generator
                .columns
                .iter()
                .find(|column| &column.name == name)
                .map(|column| column.id)
                .ok_or_else(|| {
                    RainforestError::ParseResponse(format!(
                        "created tabular variable has no column \"{name}\""
                    ))
                })
        })
        .collect()
}

/// Parse CSV text: comma separated, `"` quoting with `""` escapes, quoted
/// fields may span lines. Every record must have as many fields as the first.
/// Blank lines are skipped; a quoted empty field is not blank.
///
/// # Errors
///
/// Returns `Csv` with the line of the problem.
pub fn parse_csv(content: &str) -> Result<Vec<Vec<String>>> {
    let mut records: Vec<Vec<String>> = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = content.chars().peekable();

    let mut finish_record =
        |record: &mut Vec<String>, record_line: usize, quoted: bool| -> Result<()> {
            // A lone unquoted empty field is a blank line; `""` is a value.
            if record.len() == 1 && record[0].is_empty() && !quoted {
                record.clear();
                return Ok(());
            }
            if let Some(first) = records.first()
                && first.len() != record.len()
            {
                return Err(RainforestError::Csv {
                    line: record_line,
                    message: format!("expected {} fields, found {}", first.len(), record.len()),
                });
            }
            records.push(std::mem::take(record));
            Ok(())
        };

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() && !quoted => {
                in_quotes = true;
                quoted = true;
            }
            '"' => {
                return Err(RainforestError::Csv {
                    line,
                    message: "unexpected quote in field".to_string(),
                });
            }
            ',' => {
                record.push(std::mem::take(&mut field));
                quoted = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                finish_record(&mut record, record_line, quoted)?;
                quoted = false;
                line += 1;
                record_line = line;
            }
            _ if quoted => {
                return Err(RainforestError::Csv {
                    line,
                    message: "text after closing quote".to_string(),
                });
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(RainforestError::Csv {
            line: record_line,
            message: "unterminated quoted field".to_string(),
        });
    }
    if !field.is_empty() || quoted || !record.is_empty() {
        record.push(field);
        finish_record(&mut record, record_line, quoted)?;
    }

    Ok(records)
}
