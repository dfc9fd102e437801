// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Persistent 2-3 tree index engine.
//!
//! Maps book codes to record slot offsets in the data file. The index lives
//! in a single file: a 12-byte header (root pointer plus free-space
//! bookkeeping) followed by fixed 32-byte nodes. Released nodes are chained
//! into a header-resident free-list and reused before the file grows.
//!
//! ```text
//! ┌──────────────────┐
//! │ TwoThreeTree     │  search / insert / remove / observers
//! ├──────────────────┤
//! │ NodeFile         │  header cache, allocate/release, validated reads
//! ├──────────────────┤
//! │ Node             │  32-byte codec, sentinel -1
//! └──────────────────┘
//!          │ seek I/O
//!          ▼
//! ┌──────────────────┐
//! │ books.idx        │
//! │ [Header|Node|..] │
//! └──────────────────┘
//! ```

pub mod node;
pub mod node_file;
pub mod tree;

#[cfg(test)]
mod node_file_test;

// Re-export public API
pub use node::{Node, NODE_SIZE};
pub use node_file::{IndexHeader, NodeFile, INDEX_HEADER_SIZE};
pub use tree::TwoThreeTree;
