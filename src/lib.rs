// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! libris - an on-disk indexed book store.
//!
//! A small, self-contained record store for a fixed-schema book record.
//! Records live in fixed-size slots in a data file; lookups, insertions,
//! and deletions by integer code go through a 2-3 search tree persisted in
//! an index file. Both files carry a header-resident free-list, so deleted
//! records and released tree nodes are reclaimed in place.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │ Library                                          │
//! │   add / remove / lookup / list / scan / import   │
//! ├────────────────────────┬─────────────────────────┤
//! │ TwoThreeTree           │ DataFile                │
//! │   books.idx            │   books.dat             │
//! │   [Header|Node|Node…]  │   [Header|Book|Book…]   │
//! └────────────────────────┴─────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use libris::{Book, Library};
//!
//! let mut library = Library::open(".libris")?;
//! library.add(&Book {
//!     code: 7,
//!     title: "Dune".to_string(),
//!     author: "Frank Herbert".to_string(),
//!     publisher: "Chilton Books".to_string(),
//!     edition: 1,
//!     year: 1965,
//!     price: 9.99,
//!     stock: 3,
//! })?;
//!
//! let book = library.lookup(7)?;
//! assert_eq!(book.title, "Dune");
//! # Ok::<(), libris::LibrisError>(())
//! ```

pub mod error;
pub mod index;
pub mod store;

#[cfg(test)]
mod error_test;

// Re-export commonly used types
pub use error::{LibrisError, LibrisResult};
pub use index::{Node, NodeFile, TwoThreeTree};
pub use store::{import_books, Book, DataFile, ImportReport, Library, LibraryStats};
