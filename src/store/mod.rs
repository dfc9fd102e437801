// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Book store: indexed record storage over two cooperating files.
//!
//! `Library` owns the data file (fixed-size record slots) and the 2-3 tree
//! index (code → slot offset) and exposes the operation surface the CLI
//! drives: add, remove, lookup, sorted listing, linear searches, import.
//!
//! ## Files
//!
//! - `books.dat` — record slots behind an 8-byte free-space header
//! - `books.idx` — tree nodes behind a 12-byte header (root + free-space)
//!
//! Both are opened read/write and held under exclusive advisory locks for
//! the lifetime of the `Library`, so a second process fails fast at open
//! instead of interleaving writes. Single-threaded, synchronous I/O; every
//! operation runs to completion before the next begins.

pub mod book;
pub mod data_file;
pub mod import;

#[cfg(test)]
mod book_test;

pub use book::{Book, AUTHOR_LEN, PUBLISHER_LEN, RECORD_SIZE, TITLE_LEN, TOMBSTONE};
pub use data_file::{DataFile, DATA_HEADER_SIZE, NIL};
pub use import::{import_books, parse_line, ImportReport};

use crate::error::{LibrisError, LibrisResult};
use crate::index::TwoThreeTree;
use fs2::FileExt;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Store-wide counters reported by the `stats` command.
#[derive(Debug, Clone, Serialize)]
pub struct LibraryStats {
    /// Total books registered (tree key count).
    pub books: usize,
    /// Live index nodes.
    pub nodes: usize,
    /// Tree height in edges.
    pub height: usize,
    /// Record slots ever allocated.
    pub data_slots: usize,
    /// Record slots on the free-list.
    pub data_free: usize,
    /// Index node blocks ever allocated.
    pub index_blocks: usize,
    /// Index node blocks on the free-list.
    pub index_free: usize,
    /// Sum of stock over live records.
    pub total_stock: i64,
}

/// An open book store.
pub struct Library {
    data: DataFile,
    index: TwoThreeTree,
}

impl Library {
    /// Open or create the store under `dir`.
    ///
    /// Creates the directory and both files as needed, validates headers
    /// and free-lists, and takes exclusive advisory locks on both files.
    ///
    /// ## Error Conditions
    /// - `IoError`: directory not creatable, files not openable, or a lock
    ///   is held by another process
    /// - `CorruptIndex`: header or free-list validation failed
    pub fn open<P: AsRef<Path>>(dir: P) -> LibrisResult<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| LibrisError::io("create_store_dir", e))?;

        let data = DataFile::open(dir.join("books.dat"))?;
        let index = TwoThreeTree::open(dir.join("books.idx"))?;

        data.handle()
            .try_lock_exclusive()
            .map_err(|e| LibrisError::io("lock_data_file", e))?;
        index
            .file()
            .handle()
            .try_lock_exclusive()
            .map_err(|e| LibrisError::io("lock_index_file", e))?;

        Ok(Self { data, index })
    }

    /// Register a new book.
    ///
    /// Allocates a record slot, writes the record, then inserts the code
    /// into the index. When the insert reports a duplicate the slot is
    /// released again before the error surfaces, so a rejected add consumes
    /// nothing.
    pub fn add(&mut self, book: &Book) -> LibrisResult<()> {
        if book.code < 0 {
            return Err(LibrisError::InvalidCode { code: book.code });
        }

        let slot = self.data.allocate()?;
        self.data.write_record(slot, book)?;

        match self.index.insert(book.code, slot) {
            Ok(()) => {
                self.data.flush_header()?;
                log::debug!("added book {} at slot {}", book.code, slot);
                Ok(())
            }
            Err(e) => {
                self.data.release(slot)?;
                Err(e)
            }
        }
    }

    /// Remove the book with the given code.
    ///
    /// The index entry goes first; the record slot is then tombstoned and
    /// pushed onto the data free-list for reuse.
    pub fn remove(&mut self, code: i32) -> LibrisResult<()> {
        let slot = self.index.remove(code)?;
        self.data.release(slot)?;
        log::debug!("removed book {} from slot {}", code, slot);
        Ok(())
    }

    /// Fetch the book with the given code.
    pub fn lookup(&self, code: i32) -> LibrisResult<Book> {
        match self.index.search(code)? {
            Some(slot) => self.data.read_record(slot),
            None => Err(LibrisError::NotFound { code }),
        }
    }

    /// Visit every live record in slot order.
    pub fn scan<F>(&self, visit: F) -> LibrisResult<()>
    where
        F: FnMut(i32, &Book),
    {
        self.data.scan(visit)
    }

    /// Sum of stock over all live records.
    pub fn total_stock(&self) -> LibrisResult<i64> {
        let mut total = 0i64;
        self.data.scan(|_, book| total += book.stock as i64)?;
        Ok(total)
    }

    /// Total books registered.
    ///
    /// Counts keys, not nodes: a node holding two entries contributes two.
    pub fn len(&self) -> LibrisResult<usize> {
        self.index.key_count()
    }

    /// True when no books are registered.
    pub fn is_empty(&self) -> LibrisResult<bool> {
        Ok(self.index.key_count()? == 0)
    }

    /// All books in ascending code order.
    pub fn list(&self) -> LibrisResult<Vec<Book>> {
        let entries = self.index.in_order()?;
        let mut books = Vec::with_capacity(entries.len());
        for (_, slot) in entries {
            books.push(self.data.read_record(slot)?);
        }
        Ok(books)
    }

    /// Case-insensitive substring search over authors.
    pub fn find_by_author(&self, needle: &str) -> LibrisResult<Vec<Book>> {
        self.find_matching(needle, |book| &book.author)
    }

    /// Case-insensitive substring search over titles.
    pub fn find_by_title(&self, needle: &str) -> LibrisResult<Vec<Book>> {
        self.find_matching(needle, |book| &book.title)
    }

    fn find_matching<F>(&self, needle: &str, field: F) -> LibrisResult<Vec<Book>>
    where
        F: Fn(&Book) -> &str,
    {
        let needle = needle.to_lowercase();
        let mut found = Vec::new();
        self.data.scan(|_, book| {
            if field(book).to_lowercase().contains(&needle) {
                found.push(book.clone());
            }
        })?;
        Ok(found)
    }

    /// Store-wide counters.
    pub fn stats(&self) -> LibrisResult<LibraryStats> {
        Ok(LibraryStats {
            books: self.index.key_count()?,
            nodes: self.index.node_count()?,
            height: self.index.height()?,
            data_slots: self.data.slot_count(),
            data_free: self.data.free_list_len()?,
            index_blocks: self.index.file().block_count(),
            index_free: self.index.file().free_list_len()?,
            total_stock: self.total_stock()?,
        })
    }

    /// Verify store consistency: tree invariants, acyclic free-lists, and
    /// agreement between index entries and record slots (every indexed slot
    /// holds a live record with the indexed code).
    pub fn check(&self) -> LibrisResult<()> {
        self.index.check()?;
        self.data.free_list_len()?;
        self.index.file().free_list_len()?;

        for (key, slot) in self.index.in_order()? {
            let record = self.data.read_record(slot)?;
            if record.code != key {
                return Err(LibrisError::CorruptIndex {
                    offset: slot,
                    reason: format!("index maps {} to a slot holding {}", key, record.code),
                });
            }
        }
        Ok(())
    }

    /// Data file accessor for tests and the import driver.
    pub fn data(&self) -> &DataFile {
        &self.data
    }

    /// Index accessor for tests and the stats command.
    pub fn index(&self) -> &TwoThreeTree {
        &self.index
    }
}

impl Drop for Library {
    fn drop(&mut self) {
        let _ = self.data.handle().unlock();
        let _ = self.index.file().handle().unlock();
    }
}
