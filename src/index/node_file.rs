// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Index file: fixed-size 2-3 tree nodes with a header-resident free-list.
//!
//! ## File Layout
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ IndexHeader (12 bytes)                      │
//! │   root:        i32  root node offset (-1)   │
//! │   first_empty: i32  next fresh node offset  │
//! │   head_empty:  i32  free-list head (-1)     │
//! ├─────────────────────────────────────────────┤
//! │ Node (32 bytes)                             │
//! │ Node                                        │
//! │ ...                                         │
//! └─────────────────────────────────────────────┘
//! ```
//! All offsets are byte offsets from file start. A released node is
//! rewritten as a free node: `n_keys = 0`, the free-list link stored in the
//! left-child field, every other field `-1`.
//!
//! The read path validates structure (`n_keys` in {1, 2}, aligned in-bounds
//! offsets) and raises `CorruptIndex`; the write path trusts the tree. The
//! header is cached and written through by the tree at the end of each
//! mutating operation.

use crate::error::{LibrisError, LibrisResult};
use crate::index::node::{Node, NODE_SIZE};
use crate::store::data_file::NIL;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Index file header size in bytes.
pub const INDEX_HEADER_SIZE: usize = 12;

/// Cached index file header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexHeader {
    /// Byte offset of the root node, or [`NIL`] for an empty tree.
    pub root: i32,

    /// Offset at which the next fresh node is allocated.
    pub first_empty: i32,

    /// Head of the free-list of released nodes, or [`NIL`].
    pub head_empty: i32,
}

impl IndexHeader {
    fn to_bytes(&self) -> [u8; INDEX_HEADER_SIZE] {
        let mut bytes = [0u8; INDEX_HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.root.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.first_empty.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.head_empty.to_le_bytes());
        bytes
    }

    fn from_bytes(bytes: &[u8; INDEX_HEADER_SIZE]) -> Self {
        Self {
            root: i32::from_le_bytes(bytes[0..4].try_into().unwrap()),
            first_empty: i32::from_le_bytes(bytes[4..8].try_into().unwrap()),
            head_empty: i32::from_le_bytes(bytes[8..12].try_into().unwrap()),
        }
    }
}

/// Node storage over a single file handle.
pub struct NodeFile {
    file: File,
    header: IndexHeader,
}

impl NodeFile {
    /// Open or create the index file and load its header.
    ///
    /// An existing file has its root pointer and free-list validated;
    /// violations raise `CorruptIndex`.
    pub fn open<P: AsRef<Path>>(path: P) -> LibrisResult<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path.as_ref())
            .map_err(|e| LibrisError::io("open_index_file", e))?;

        let len = file
            .metadata()
            .map_err(|e| LibrisError::io("stat_index_file", e))?
            .len();

        let mut index = Self {
            file,
            header: IndexHeader {
                root: NIL,
                first_empty: INDEX_HEADER_SIZE as i32,
                head_empty: NIL,
            },
        };

        if len == 0 {
            index.flush_header()?;
        } else {
            index.header = index.read_header()?;
            index.validate()?;
        }

        Ok(index)
    }

    fn read_header(&self) -> LibrisResult<IndexHeader> {
        let mut bytes = [0u8; INDEX_HEADER_SIZE];
        let mut f = &self.file;
        f.seek(SeekFrom::Start(0))
            .map_err(|e| LibrisError::io("seek_index_header", e))?;
        f.read_exact(&mut bytes)
            .map_err(|e| LibrisError::io("read_index_header", e))?;
        Ok(IndexHeader::from_bytes(&bytes))
    }

    /// Rewrite the on-disk header from the cached copy.
    ///
    /// Always the last write of a mutating operation.
    pub fn flush_header(&mut self) -> LibrisResult<()> {
        let bytes = self.header.to_bytes();
        let mut f = &self.file;
        f.seek(SeekFrom::Start(0))
            .map_err(|e| LibrisError::io("seek_index_header", e))?;
        f.write_all(&bytes)
            .map_err(|e| LibrisError::io("write_index_header", e))?;
        Ok(())
    }

    fn validate(&self) -> LibrisResult<()> {
        if self.header.root != NIL {
            self.check_node_offset(self.header.root, "root")?;
        }
        self.check_fresh_offset(self.header.first_empty)?;
        self.free_list_len()?;
        Ok(())
    }

    fn check_fresh_offset(&self, off: i32) -> LibrisResult<()> {
        let base = INDEX_HEADER_SIZE as i32;
        if off < base || (off - base) % NODE_SIZE as i32 != 0 {
            return Err(LibrisError::CorruptIndex {
                offset: off,
                reason: "first_empty is not a valid node offset".to_string(),
            });
        }
        Ok(())
    }

    fn check_node_offset(&self, off: i32, what: &str) -> LibrisResult<()> {
        let base = INDEX_HEADER_SIZE as i32;
        if off < base || (off - base) % NODE_SIZE as i32 != 0 || off >= self.header.first_empty {
            return Err(LibrisError::CorruptIndex {
                offset: off,
                reason: format!("{} is not a valid node offset", what),
            });
        }
        Ok(())
    }

    /// Return an offset at which a new node may be written.
    ///
    /// Prefers the free-list head, returning the OLD head and advancing the
    /// cached header past it; otherwise takes `first_empty` and bumps it by
    /// one node. The caller persists the header after writing node payloads.
    pub fn allocate(&mut self) -> LibrisResult<i32> {
        if self.header.head_empty != NIL {
            let off = self.header.head_empty;
            let next = self.read_free_next(off)?;
            if next != NIL {
                self.check_node_offset(next, "free-list link")?;
            }
            self.header.head_empty = next;
            log::debug!("reusing index node at offset {}", off);
            return Ok(off);
        }
        let off = self.header.first_empty;
        self.header.first_empty += NODE_SIZE as i32;
        Ok(off)
    }

    /// Rewrite the node at `off` as a free node linked to the current head
    /// and push it onto the free-list. The header flush is left to the end
    /// of the enclosing tree operation.
    pub fn release(&mut self, off: i32) -> LibrisResult<()> {
        self.check_node_offset(off, "released node")?;

        let free = Node {
            n_keys: 0,
            keys: [NIL, NIL],
            slots: [NIL, NIL],
            children: [self.header.head_empty, NIL, NIL],
        };
        self.write_at(off, &free.to_bytes(), "release_node")?;

        self.header.head_empty = off;
        Ok(())
    }

    /// Read the free-list link out of a released node (its left-child field).
    fn read_free_next(&self, off: i32) -> LibrisResult<i32> {
        let mut bytes = [0u8; 4];
        let mut f = &self.file;
        f.seek(SeekFrom::Start(off as u64 + 20))
            .map_err(|e| LibrisError::io("seek_free_node", e))?;
        f.read_exact(&mut bytes)
            .map_err(|e| LibrisError::io("read_free_node", e))?;
        Ok(i32::from_le_bytes(bytes))
    }

    /// Read and structurally validate the live node at `off`.
    pub fn read_node(&self, off: i32) -> LibrisResult<Node> {
        self.check_node_offset(off, "node offset")?;
        let mut bytes = [0u8; NODE_SIZE];
        let mut f = &self.file;
        f.seek(SeekFrom::Start(off as u64))
            .map_err(|e| LibrisError::io("seek_node", e))?;
        f.read_exact(&mut bytes)
            .map_err(|e| LibrisError::io("read_node", e))?;

        let node = Node::from_bytes(&bytes);
        if node.n_keys != 1 && node.n_keys != 2 {
            return Err(LibrisError::CorruptIndex {
                offset: off,
                reason: format!("node key count {} outside {{1, 2}}", node.n_keys),
            });
        }
        for &child in &node.children {
            if child != NIL {
                self.check_node_offset(child, "child")?;
            }
        }
        Ok(node)
    }

    /// Write `node` at `off`.
    pub fn write_node(&mut self, off: i32, node: &Node) -> LibrisResult<()> {
        self.check_fresh_offset(off)?;
        self.write_at(off, &node.to_bytes(), "write_node")
    }

    fn write_at(&mut self, off: i32, bytes: &[u8], operation: &str) -> LibrisResult<()> {
        let mut f = &self.file;
        f.seek(SeekFrom::Start(off as u64))
            .map_err(|e| LibrisError::io(operation, e))?;
        f.write_all(bytes)
            .map_err(|e| LibrisError::io(operation, e))?;
        Ok(())
    }

    /// Root node offset, or [`NIL`].
    pub fn root(&self) -> i32 {
        self.header.root
    }

    /// Update the cached root pointer; persisted by the next header flush.
    pub fn set_root(&mut self, off: i32) {
        self.header.root = off;
    }

    /// Number of node blocks ever allocated (live or free).
    pub fn block_count(&self) -> usize {
        ((self.header.first_empty - INDEX_HEADER_SIZE as i32) / NODE_SIZE as i32) as usize
    }

    /// Length of the free-list; errors if it cycles or escapes the file.
    pub fn free_list_len(&self) -> LibrisResult<usize> {
        let mut count = 0usize;
        let mut off = self.header.head_empty;
        let bound = self.block_count();
        while off != NIL {
            self.check_node_offset(off, "free-list entry")?;
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

    /// Head of the free-list, or [`NIL`].
    pub fn head_empty(&self) -> i32 {
        self.header.head_empty
    }

    /// Underlying file handle (for advisory locking at open).
    pub fn handle(&self) -> &File {
        &self.file
    }
}
