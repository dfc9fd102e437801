// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Data file: fixed-size record slots with a header-resident free-list.
//!
//! ## File Layout
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ DataHeader (8 bytes)                        │
//! │   first_empty: i32  next fresh slot offset  │
//! │   head_empty:  i32  free-list head (-1)     │
//! ├─────────────────────────────────────────────┤
//! │ Record slot 0 (427 bytes)                   │
//! │ Record slot 1                               │
//! │ ...                                         │
//! └─────────────────────────────────────────────┘
//! ```
//! Slots are at `8 + i * 427`. A released slot is tombstoned (`code = -1`)
//! and linked into a singly-linked free-list: the next free offset is stored
//! in the i32 right after the code, and the rest of the slot is zeroed.
//!
//! The header is cached in memory. `release` writes it through immediately;
//! `allocate` only mutates the cache, and the caller persists it with
//! [`DataFile::flush_header`] after writing the slot payload, so the on-disk
//! order is always payload, then free-list links, then header.

use crate::error::{LibrisError, LibrisResult};
use crate::store::book::{Book, RECORD_SIZE, TOMBSTONE};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Sentinel for an absent offset, key, or pointer.
pub const NIL: i32 = -1;

/// Data file header size in bytes.
pub const DATA_HEADER_SIZE: usize = 8;

/// Cached data file header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataHeader {
    /// Offset at which the next fresh slot is allocated.
    pub first_empty: i32,

    /// Head of the free-list of released slots, or [`NIL`].
    pub head_empty: i32,
}

impl DataHeader {
    fn to_bytes(&self) -> [u8; DATA_HEADER_SIZE] {
        let mut bytes = [0u8; DATA_HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.first_empty.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.head_empty.to_le_bytes());
        bytes
    }

    fn from_bytes(bytes: &[u8; DATA_HEADER_SIZE]) -> Self {
        Self {
            first_empty: i32::from_le_bytes(bytes[0..4].try_into().unwrap()),
            head_empty: i32::from_le_bytes(bytes[4..8].try_into().unwrap()),
        }
    }
}

/// Record slot storage over a single file handle.
pub struct DataFile {
    file: File,
    header: DataHeader,
}

impl DataFile {
    /// Open or create the data file and load its header.
    ///
    /// A new file gets a fresh header (`first_empty` right after the header,
    /// empty free-list). An existing file has its header and free-list
    /// validated; a cycle or an out-of-bounds link raises `CorruptIndex`.
    pub fn open<P: AsRef<Path>>(path: P) -> LibrisResult<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path.as_ref())
            .map_err(|e| LibrisError::io("open_data_file", e))?;

        let len = file
            .metadata()
            .map_err(|e| LibrisError::io("stat_data_file", e))?
            .len();

        let mut data = Self {
            file,
            header: DataHeader {
                first_empty: DATA_HEADER_SIZE as i32,
                head_empty: NIL,
            },
        };

        if len == 0 {
            data.flush_header()?;
        } else {
            data.header = data.read_header()?;
            data.validate()?;
        }

        Ok(data)
    }

    fn read_header(&self) -> LibrisResult<DataHeader> {
        let mut bytes = [0u8; DATA_HEADER_SIZE];
        let mut f = &self.file;
        f.seek(SeekFrom::Start(0))
            .map_err(|e| LibrisError::io("seek_data_header", e))?;
        f.read_exact(&mut bytes)
            .map_err(|e| LibrisError::io("read_data_header", e))?;
        Ok(DataHeader::from_bytes(&bytes))
    }

    /// Rewrite the on-disk header from the cached copy.
    ///
    /// Always the last write of a mutating operation.
    pub fn flush_header(&mut self) -> LibrisResult<()> {
        let bytes = self.header.to_bytes();
        let mut f = &self.file;
        f.seek(SeekFrom::Start(0))
            .map_err(|e| LibrisError::io("seek_data_header", e))?;
        f.write_all(&bytes)
            .map_err(|e| LibrisError::io("write_data_header", e))?;
        Ok(())
    }

    /// Validate the header and walk the free-list looking for cycles,
    /// misaligned offsets, and out-of-bounds links.
    fn validate(&self) -> LibrisResult<()> {
        self.check_fresh_offset(self.header.first_empty)?;
        self.free_list_len()?;
        Ok(())
    }

    fn check_fresh_offset(&self, off: i32) -> LibrisResult<()> {
        let base = DATA_HEADER_SIZE as i32;
        if off < base || (off - base) % RECORD_SIZE as i32 != 0 {
            return Err(LibrisError::CorruptIndex {
                offset: off,
                reason: "first_empty is not a valid slot offset".to_string(),
            });
        }
        Ok(())
    }

    fn check_slot_offset(&self, off: i32, what: &str) -> LibrisResult<()> {
        let base = DATA_HEADER_SIZE as i32;
        if off < base || (off - base) % RECORD_SIZE as i32 != 0 || off >= self.header.first_empty {
            return Err(LibrisError::CorruptIndex {
                offset: off,
                reason: format!("{} is not a valid slot offset", what),
            });
        }
        Ok(())
    }

    /// Return an offset at which a new record may be written.
    ///
    /// Prefers the free-list head, returning the OLD head and advancing the
    /// cached header past it; otherwise takes `first_empty` and bumps it by
    /// one slot. The header is not persisted here — write the record payload
    /// first, then call [`DataFile::flush_header`].
    pub fn allocate(&mut self) -> LibrisResult<i32> {
        if self.header.head_empty != NIL {
            let off = self.header.head_empty;
            let next = self.read_free_next(off)?;
            if next != NIL {
                self.check_slot_offset(next, "free-list link")?;
            }
            self.header.head_empty = next;
            log::debug!("reusing data slot at offset {}", off);
            return Ok(off);
        }
        let off = self.header.first_empty;
        self.header.first_empty += RECORD_SIZE as i32;
        Ok(off)
    }

    /// Tombstone the slot at `off` and push it onto the free-list.
    ///
    /// Writes the full free-slot image (`code = -1`, link to the old head,
    /// zeroed tail), then the header.
    pub fn release(&mut self, off: i32) -> LibrisResult<()> {
        self.check_slot_offset(off, "released slot")?;

        let mut image = [0u8; RECORD_SIZE];
        image[0..4].copy_from_slice(&TOMBSTONE.to_le_bytes());
        image[4..8].copy_from_slice(&self.header.head_empty.to_le_bytes());
        self.write_at(off, &image, "release_slot")?;

        self.header.head_empty = off;
        self.flush_header()
    }

    /// Read the free-list link out of a released slot.
    fn read_free_next(&self, off: i32) -> LibrisResult<i32> {
        let mut bytes = [0u8; 4];
        let mut f = &self.file;
        f.seek(SeekFrom::Start(off as u64 + 4))
            .map_err(|e| LibrisError::io("seek_free_slot", e))?;
        f.read_exact(&mut bytes)
            .map_err(|e| LibrisError::io("read_free_slot", e))?;
        Ok(i32::from_le_bytes(bytes))
    }

    /// Read the record stored at `off`.
    pub fn read_record(&self, off: i32) -> LibrisResult<Book> {
        self.check_slot_offset(off, "record offset")?;
        let mut bytes = [0u8; RECORD_SIZE];
        let mut f = &self.file;
        f.seek(SeekFrom::Start(off as u64))
            .map_err(|e| LibrisError::io("seek_record", e))?;
        f.read_exact(&mut bytes)
            .map_err(|e| LibrisError::io("read_record", e))?;
        Ok(Book::from_bytes(&bytes))
    }

    /// Write `book` into the slot at `off`.
    pub fn write_record(&mut self, off: i32, book: &Book) -> LibrisResult<()> {
        self.check_slot_offset(off, "record offset")?;
        let bytes = book.to_bytes();
        self.write_at(off, &bytes, "write_record")
    }

    fn write_at(&mut self, off: i32, bytes: &[u8], operation: &str) -> LibrisResult<()> {
        let mut f = &self.file;
        f.seek(SeekFrom::Start(off as u64))
            .map_err(|e| LibrisError::io(operation, e))?;
        f.write_all(bytes)
            .map_err(|e| LibrisError::io(operation, e))?;
        Ok(())
    }

    /// Visit every live record in slot order, skipping tombstones.
    pub fn scan<F>(&self, mut visit: F) -> LibrisResult<()>
    where
        F: FnMut(i32, &Book),
    {
        let mut off = DATA_HEADER_SIZE as i32;
        while off < self.header.first_empty {
            let book = self.read_record(off)?;
            if book.code != TOMBSTONE {
                visit(off, &book);
            }
            off += RECORD_SIZE as i32;
        }
        Ok(())
    }

    /// Number of slots ever allocated (live or free).
    pub fn slot_count(&self) -> usize {
        ((self.header.first_empty - DATA_HEADER_SIZE as i32) / RECORD_SIZE as i32) as usize
    }

    /// Length of the free-list; errors if it cycles or escapes the file.
    pub fn free_list_len(&self) -> LibrisResult<usize> {
        let mut count = 0usize;
        let mut off = self.header.head_empty;
        let bound = self.slot_count();
        while off != NIL {
            self.check_slot_offset(off, "free-list entry")?;
            count += 1;
            if count > bound {
                return Err(LibrisError::CorruptIndex {
                    offset: off,
                    reason: "free-list cycle detected".to_string(),
                });
            }
            off = self.read_free_next(off)?;
        }
        Ok(count)
    }

    /// Offset of the next fresh slot.
    pub fn first_empty(&self) -> i32 {
        self.header.first_empty
    }

    /// Head of the free-list, or [`NIL`].
    pub fn head_empty(&self) -> i32 {
        self.header.head_empty
    }

    /// Underlying file handle (for advisory locking at open).
    pub fn handle(&self) -> &File {
        &self.file
    }
}
