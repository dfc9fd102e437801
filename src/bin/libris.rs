// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! libris CLI tool.
//!
//! Command-line interface for the indexed book store.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod formatters;

#[derive(Parser)]
#[command(name = "libris")]
#[command(version = "0.1.0")]
#[command(about = "libris - indexed book store operations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new book
    Add {
        /// Path to the store directory
        path: PathBuf,

        /// Book code (primary key)
        #[arg(short, long)]
        code: i32,

        /// Title
        #[arg(short, long)]
        title: String,

        /// Author
        #[arg(short, long)]
        author: String,

        /// Publisher
        #[arg(short, long, default_value = "")]
        publisher: String,

        /// Edition
        #[arg(short, long, default_value_t = 1)]
        edition: i32,

        /// Publication year
        #[arg(short, long, default_value_t = 0)]
        year: i32,

        /// Price
        #[arg(long, default_value_t = 0.0)]
        price: f64,

        /// Copies in stock
        #[arg(short, long, default_value_t = 0)]
        stock: i32,
    },

    /// Remove a book by code
    Remove {
        /// Path to the store directory
        path: PathBuf,

        /// Book code
        code: i32,
    },

    /// Look up a book by code
    Lookup {
        /// Path to the store directory
        path: PathBuf,

        /// Book code
        code: i32,

        /// Output format: table|json
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// List all books in code order
    List {
        /// Path to the store directory
        path: PathBuf,

        /// Output format: table|json
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Search books by author or title (case-insensitive substring)
    Search {
        /// Path to the store directory
        path: PathBuf,

        /// Match against the author field
        #[arg(short, long)]
        author: Option<String>,

        /// Match against the title field
        #[arg(short, long)]
        title: Option<String>,

        /// Output format: table|json
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Import semicolon-separated records from a text file
    Import {
        /// Path to the store directory
        path: PathBuf,

        /// Import file (code;title;author;publisher;edition;year;price;stock)
        file: PathBuf,
    },

    /// Show store statistics
    Stats {
        /// Path to the store directory
        path: PathBuf,

        /// Output format: table|json
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Open interactive shell
    Shell {
        /// Path to the store directory
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Add {
            path,
            code,
            title,
            author,
            publisher,
            edition,
            year,
            price,
            stock,
        } => commands::add(
            &path,
            libris::Book {
                code,
                title,
                author,
                publisher,
                edition,
                year,
                price,
                stock,
            },
        ),
        Commands::Remove { path, code } => commands::remove(&path, code),
        Commands::Lookup { path, code, format } => commands::lookup(&path, code, &format),
        Commands::List { path, format } => commands::list(&path, &format),
        Commands::Search {
            path,
            author,
            title,
            format,
        } => commands::search(&path, author.as_deref(), title.as_deref(), &format),
        Commands::Import { path, file } => commands::import(&path, &file),
        Commands::Stats { path, format } => commands::stats(&path, &format),
        Commands::Shell { path } => commands::shell::run(&path),
    }
}
