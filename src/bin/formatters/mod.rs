// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Output formatters for CLI results.

use anyhow::{bail, Result};
use libris::{Book, LibraryStats};

/// Formats records in the requested format (`table` or `json`).
pub fn format_books(books: &[Book], format: &str) -> Result<String> {
    match format {
        "table" => Ok(format_table(books)),
        "json" => Ok(format!("{}\n", serde_json::to_string_pretty(books)?)),
        other => bail!("unknown format '{}' (expected table|json)", other),
    }
}

/// Formats store statistics in the requested format.
pub fn format_stats(stats: &LibraryStats, format: &str) -> Result<String> {
    match format {
        "table" => {
            let mut out = String::new();
            out.push_str(&format!("Books registered:  {}\n", stats.books));
            out.push_str(&format!("Total stock:       {}\n", stats.total_stock));
            out.push_str(&format!("Tree height:       {}\n", stats.height));
            out.push_str(&format!(
                "Index nodes:       {} live, {} free\n",
                stats.nodes, stats.index_free
            ));
            out.push_str(&format!(
                "Record slots:      {} allocated, {} free\n",
                stats.data_slots, stats.data_free
            ));
            Ok(out)
        }
        "json" => Ok(format!("{}\n", serde_json::to_string_pretty(stats)?)),
        other => bail!("unknown format '{}' (expected table|json)", other),
    }
}

/// Human-readable table of records.
fn format_table(books: &[Book]) -> String {
    if books.is_empty() {
        return "0 books\n".to_string();
    }

    let headers = ["code", "title", "author", "year", "price", "stock"];
    let mut rows: Vec<[String; 6]> = Vec::with_capacity(books.len());
    for book in books {
        rows.push([
            book.code.to_string(),
            book.title.clone(),
            book.author.clone(),
            book.year.to_string(),
            format!("{:.2}", book.price),
            book.stock.to_string(),
        ]);
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let border = {
        let mut line = String::from("+");
        for w in &widths {
            line.push_str(&"-".repeat(w + 2));
            line.push('+');
        }
        line.push('\n');
        line
    };

    let mut out = String::new();
    out.push_str(&border);
    out.push('|');
    for (i, h) in headers.iter().enumerate() {
        out.push_str(&format!(" {:<width$} |", h, width = widths[i]));
    }
    out.push('\n');
    out.push_str(&border);
    for row in &rows {
        out.push('|');
        for (i, cell) in row.iter().enumerate() {
            out.push_str(&format!(" {:<width$} |", cell, width = widths[i]));
        }
        out.push('\n');
    }
    out.push_str(&border);
    out.push_str(&format!("{} book(s)\n", books.len()));
    out
}
