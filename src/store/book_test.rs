// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Tests for the book record codec.

use super::*;

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Book {
        Book {
            code: 42,
            title: "The Rust Programming Language".to_string(),
            author: "Klabnik, Steve; Nichols, Carol".to_string(),
            publisher: "No Starch Press".to_string(),
            edition: 2,
            year: 2019,
            price: 39.95,
            stock: 7,
        }
    }

    #[test]
    fn test_record_size_constant() {
        assert_eq!(
            RECORD_SIZE,
            4 + TITLE_LEN + AUTHOR_LEN + PUBLISHER_LEN + 4 + 4 + 8 + 4
        );
    }

    #[test]
    fn test_roundtrip_preserves_every_field() {
        let book = sample();
        let decoded = Book::from_bytes(&book.to_bytes());
        assert_eq!(decoded, book);
    }

    #[test]
    fn test_string_tails_are_zero_filled() {
        let bytes = sample().to_bytes();
        // Title payload ends well before the field does; the tail must be
        // all zeros so identical records produce identical images.
        let title_field = &bytes[4..155];
        let end = title_field.iter().position(|&b| b == 0).unwrap();
        assert!(title_field[end..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_identical_records_identical_images() {
        assert_eq!(sample().to_bytes(), sample().to_bytes());
    }

    #[test]
    fn test_overlong_title_truncated_with_null() {
        let mut book = sample();
        book.title = "x".repeat(400);
        let bytes = book.to_bytes();
        assert_eq!(bytes[4 + TITLE_LEN - 1], 0);

        let decoded = Book::from_bytes(&bytes);
        assert_eq!(decoded.title.len(), TITLE_LEN - 1);
        // Author field must not have been overrun.
        assert_eq!(decoded.author, book.author);
    }

    #[test]
    fn test_truncation_respects_char_boundary() {
        let mut book = sample();
        // 76 two-byte characters = 152 bytes, one over the 150-byte payload.
        book.title = "é".repeat(76);
        let decoded = Book::from_bytes(&book.to_bytes());
        assert_eq!(decoded.title, "é".repeat(75));
    }

    #[test]
    fn test_field_offsets_pinned() {
        let book = sample();
        let bytes = book.to_bytes();
        assert_eq!(i32::from_le_bytes(bytes[0..4].try_into().unwrap()), 42);
        assert_eq!(&bytes[4..7], b"The");
        assert_eq!(&bytes[155..158], b"Kla");
        assert_eq!(&bytes[356..358], b"No");
        assert_eq!(i32::from_le_bytes(bytes[407..411].try_into().unwrap()), 2);
        assert_eq!(i32::from_le_bytes(bytes[411..415].try_into().unwrap()), 2019);
        assert_eq!(
            f64::from_le_bytes(bytes[415..423].try_into().unwrap()),
            39.95
        );
        assert_eq!(i32::from_le_bytes(bytes[423..427].try_into().unwrap()), 7);
    }

    #[test]
    fn test_empty_strings() {
        let book = Book {
            code: 1,
            title: String::new(),
            author: String::new(),
            publisher: String::new(),
            edition: 0,
            year: 0,
            price: 0.0,
            stock: 0,
        };
        let decoded = Book::from_bytes(&book.to_bytes());
        assert_eq!(decoded, book);
    }
}
