// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Interactive shell (REPL) implementation.

use anyhow::{Context, Result};
use libris::store::parse_line;
use libris::{import_books, Library};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::Path;

use crate::formatters;

pub fn run(path: &Path) -> Result<()> {
    let mut library = Library::open(path)
        .with_context(|| format!("Failed to open store at {}", path.display()))?;

    println!("libris shell v0.1.0");
    println!("Store: {}", path.display());
    println!("Type .help for help, .exit to quit\n");

    let mut rl = DefaultEditor::new()?;

    loop {
        let readline = rl.readline("libris> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(trimmed);

                if trimmed.starts_with('.') {
                    match handle_dot_command(trimmed, &library) {
                        Ok(should_exit) => {
                            if should_exit {
                                break;
                            }
                        }
                        Err(e) => eprintln!("Error: {}", e),
                    }
                    continue;
                }

                if let Err(e) = handle_command(trimmed, &mut library) {
                    eprintln!("Error: {}", e);
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Error: {}", e);
                break;
            }
        }
    }

    println!("Goodbye");
    Ok(())
}

fn handle_dot_command(command: &str, library: &Library) -> Result<bool> {
    match command {
        ".exit" | ".quit" => Ok(true),
        ".help" => {
            print_help();
            Ok(false)
        }
        ".stats" => {
            print!("{}", formatters::format_stats(&library.stats()?, "table")?);
            Ok(false)
        }
        other => {
            eprintln!("Unknown command: {} (try .help)", other);
            Ok(false)
        }
    }
}

fn handle_command(line: &str, library: &mut Library) -> Result<()> {
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb {
        "add" => {
            // Same field order as the import format.
            let book = parse_line(rest, 1)?;
            library.add(&book)?;
            println!("Added book {} ({})", book.code, book.title);
        }
        "remove" => {
            let code: i32 = rest.parse().context("remove expects a numeric code")?;
            library.remove(code)?;
            println!("Removed book {}", code);
        }
        "lookup" => {
            let code: i32 = rest.parse().context("lookup expects a numeric code")?;
            let book = library.lookup(code)?;
            print!(
                "{}",
                formatters::format_books(std::slice::from_ref(&book), "table")?
            );
        }
        "list" => {
            print!("{}", formatters::format_books(&library.list()?, "table")?);
        }
        "author" => {
            print!(
                "{}",
                formatters::format_books(&library.find_by_author(rest)?, "table")?
            );
        }
        "title" => {
            print!(
                "{}",
                formatters::format_books(&library.find_by_title(rest)?, "table")?
            );
        }
        "import" => {
            let report = import_books(library, rest)?;
            println!("Imported {} book(s)", report.imported);
            for (line_no, err) in &report.skipped {
                eprintln!("Skipped line {}: {}", line_no, err);
            }
        }
        "count" => {
            println!("{} book(s) registered", library.len()?);
        }
        other => {
            eprintln!("Unknown command: {} (try .help)", other);
        }
    }
    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  add CODE;TITLE;AUTHOR;PUBLISHER;EDITION;YEAR;PRICE;STOCK");
    println!("  remove CODE           delete a book");
    println!("  lookup CODE           fetch one book");
    println!("  list                  all books in code order");
    println!("  author TEXT           search authors (substring)");
    println!("  title TEXT            search titles (substring)");
    println!("  import FILE           load semicolon-separated records");
    println!("  count                 number of registered books");
    println!("  .stats                store statistics");
    println!("  .exit                 quit");
}
