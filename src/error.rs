// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Error types for libris operations.
//!
//! Provides structured error handling with detailed context for debugging.
//! `DuplicateKey` and `NotFound` are expected outcomes and surfaced to the
//! caller unchanged; `IoError` aborts the current operation; `CorruptIndex`
//! is fatal for the operation and never silently repaired.

use std::fmt;

/// Standard Result type for all libris operations.
pub type LibrisResult<T> = Result<T, LibrisError>;

/// Error types for libris operations.
#[derive(Debug, Clone)]
pub enum LibrisError {
    /// Insert of a primary key already present in the index.
    DuplicateKey { code: i32 },

    /// Lookup or removal of an absent primary key.
    NotFound { code: i32 },

    /// I/O error during file operations.
    IoError { operation: String, reason: String },

    /// Structural invariant violated in the index or data file.
    ///
    /// Raised on load or read: key count outside {1, 2}, offset out of
    /// bounds or misaligned, free-list cycle.
    CorruptIndex { offset: i32, reason: String },

    /// Malformed line in a text import file.
    InvalidLine { line: usize, reason: String },

    /// Negative code passed to `add` (would collide with the tombstone
    /// sentinel).
    InvalidCode { code: i32 },
}

impl fmt::Display for LibrisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LibrisError::DuplicateKey { code } => {
                write!(f, "Duplicate key: a book with code {} already exists", code)
            }
            LibrisError::NotFound { code } => {
                write!(f, "Not found: no book with code {}", code)
            }
            LibrisError::IoError { operation, reason } => {
                write!(f, "I/O error during '{}': {}", operation, reason)
            }
            LibrisError::CorruptIndex { offset, reason } => {
                write!(f, "Corrupt index at offset {}: {}", offset, reason)
            }
            LibrisError::InvalidLine { line, reason } => {
                write!(f, "Invalid import line {}: {}", line, reason)
            }
            LibrisError::InvalidCode { code } => {
                write!(f, "Invalid code {}: codes must be non-negative", code)
            }
        }
    }
}

impl std::error::Error for LibrisError {}

impl LibrisError {
    /// Wraps a `std::io::Error` with the name of the failing operation.
    pub fn io(operation: &str, err: std::io::Error) -> Self {
        LibrisError::IoError {
            operation: operation.to_string(),
            reason: err.to_string(),
        }
    }
}
