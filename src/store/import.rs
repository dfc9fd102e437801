// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Text ingest for book records.
//!
//! One record per line, eight fields separated by `;`:
//!
//! ```text
//! code;title;author;publisher;edition;year;price;stock
//! ```
//!
//! Whitespace is trimmed around every field, decimal commas in the price
//! are normalised to dots before parsing, and blank lines or `#` comments
//! are skipped. A malformed or duplicate line is reported and skipped; the
//! rest of the file still imports.

use crate::error::{LibrisError, LibrisResult};
use crate::store::book::Book;
use crate::store::Library;
use std::fs;
use std::path::Path;

/// Outcome of an import run.
#[derive(Debug)]
pub struct ImportReport {
    /// Records successfully added.
    pub imported: usize,

    /// Rejected lines with the error each one produced.
    pub skipped: Vec<(usize, LibrisError)>,
}

/// Parses a single `;`-separated line into a [`Book`].
///
/// ## Input
/// - `line`: raw line content (no trailing newline)
/// - `line_no`: 1-based line number for error reporting
///
/// ## Error Conditions
/// - `InvalidLine`: wrong field count or an unparsable numeric field
pub fn parse_line(line: &str, line_no: usize) -> LibrisResult<Book> {
    let fields: Vec<&str> = line.split(';').map(str::trim).collect();
    if fields.len() != 8 {
        return Err(LibrisError::InvalidLine {
            line: line_no,
            reason: format!("expected 8 fields, got {}", fields.len()),
        });
    }

    // Decimal commas are common in exported price columns.
    let price_text = fields[6].replace(',', ".");

    Ok(Book {
        code: parse_num(fields[0], "code", line_no)?,
        title: fields[1].to_string(),
        author: fields[2].to_string(),
        publisher: fields[3].to_string(),
        edition: parse_num(fields[4], "edition", line_no)?,
        year: parse_num(fields[5], "year", line_no)?,
        price: price_text
            .parse::<f64>()
            .map_err(|_| invalid(line_no, "price", &price_text))?,
        stock: parse_num(fields[7], "stock", line_no)?,
    })
}

fn parse_num(text: &str, field: &str, line_no: usize) -> LibrisResult<i32> {
    text.parse::<i32>().map_err(|_| invalid(line_no, field, text))
}

fn invalid(line_no: usize, field: &str, text: &str) -> LibrisError {
    LibrisError::InvalidLine {
        line: line_no,
        reason: format!("unparsable {} '{}'", field, text),
    }
}

/// Import every record from a text file into `library`.
///
/// Blank lines and `#` comments are skipped silently. Lines that fail to
/// parse, duplicate an existing code, or carry a negative code are
/// collected in the report and logged; they do not abort the run. I/O
/// failures do.
pub fn import_books<P: AsRef<Path>>(library: &mut Library, path: P) -> LibrisResult<ImportReport> {
    let content = fs::read_to_string(path.as_ref())
        .map_err(|e| LibrisError::io("read_import_file", e))?;

    let mut report = ImportReport {
        imported: 0,
        skipped: Vec::new(),
    };

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let book = match parse_line(trimmed, line_no) {
            Ok(book) => book,
            Err(e) => {
                log::warn!("import line {}: {}", line_no, e);
                report.skipped.push((line_no, e));
                continue;
            }
        };

        match library.add(&book) {
            Ok(()) => report.imported += 1,
            Err(e @ (LibrisError::DuplicateKey { .. } | LibrisError::InvalidCode { .. })) => {
                log::warn!("import line {}: {}", line_no, e);
                report.skipped.push((line_no, e));
            }
            Err(e) => return Err(e),
        }
    }

    Ok(report)
}
