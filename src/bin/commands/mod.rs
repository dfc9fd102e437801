// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! CLI command implementations.

pub mod shell;

use anyhow::{bail, Context, Result};
use libris::{import_books, Book, Library};
use std::path::Path;

use crate::formatters;

fn open(path: &Path) -> Result<Library> {
    Library::open(path).with_context(|| format!("Failed to open store at {}", path.display()))
}

pub fn add(path: &Path, book: Book) -> Result<()> {
    let mut library = open(path)?;
    library.add(&book)?;
    println!("Added book {} ({})", book.code, book.title);
    Ok(())
}

pub fn remove(path: &Path, code: i32) -> Result<()> {
    let mut library = open(path)?;
    library.remove(code)?;
    println!("Removed book {}", code);
    Ok(())
}

pub fn lookup(path: &Path, code: i32, format: &str) -> Result<()> {
    let library = open(path)?;
    let book = library.lookup(code)?;
    print!(
        "{}",
        formatters::format_books(std::slice::from_ref(&book), format)?
    );
    Ok(())
}

pub fn list(path: &Path, format: &str) -> Result<()> {
    let library = open(path)?;
    let books = library.list()?;
    print!("{}", formatters::format_books(&books, format)?);
    Ok(())
}

pub fn search(path: &Path, author: Option<&str>, title: Option<&str>, format: &str) -> Result<()> {
    let library = open(path)?;
    let books = match (author, title) {
        (Some(author), None) => library.find_by_author(author)?,
        (None, Some(title)) => library.find_by_title(title)?,
        _ => bail!("pass exactly one of --author or --title"),
    };
    print!("{}", formatters::format_books(&books, format)?);
    Ok(())
}

pub fn import(path: &Path, file: &Path) -> Result<()> {
    let mut library = open(path)?;
    let report = import_books(&mut library, file)
        .with_context(|| format!("Failed to import {}", file.display()))?;
    println!("Imported {} book(s)", report.imported);
    for (line, err) in &report.skipped {
        eprintln!("Skipped line {}: {}", line, err);
    }
    Ok(())
}

pub fn stats(path: &Path, format: &str) -> Result<()> {
    let library = open(path)?;
    let stats = library.stats()?;
    print!("{}", formatters::format_stats(&stats, format)?);
    Ok(())
}
