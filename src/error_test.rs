// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Tests for error display and classification.

use super::error::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_display() {
        let err = LibrisError::DuplicateKey { code: 42 };
        assert_eq!(
            err.to_string(),
            "Duplicate key: a book with code 42 already exists"
        );
    }

    #[test]
    fn test_not_found_display() {
        let err = LibrisError::NotFound { code: 7 };
        assert_eq!(err.to_string(), "Not found: no book with code 7");
    }

    #[test]
    fn test_io_error_carries_operation() {
        let err = LibrisError::io(
            "open_data_file",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        match &err {
            LibrisError::IoError { operation, reason } => {
                assert_eq!(operation, "open_data_file");
                assert!(reason.contains("denied"));
            }
            other => panic!("expected IoError, got {:?}", other),
        }
        assert!(err.to_string().contains("open_data_file"));
    }

    #[test]
    fn test_corrupt_index_display() {
        let err = LibrisError::CorruptIndex {
            offset: 44,
            reason: "free-list cycle detected".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Corrupt index at offset 44: free-list cycle detected"
        );
    }

    #[test]
    fn test_errors_are_std_error() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        assert_error(&LibrisError::NotFound { code: 1 });
    }
}
