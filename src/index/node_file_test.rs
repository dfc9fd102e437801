// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Tests for the index file node allocator and free-list.

use super::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LibrisError;
    use crate::index::node::{Node, NODE_SIZE};
    use crate::store::data_file::NIL;
    use tempfile::tempdir;

    #[test]
    fn test_new_file_header() {
        let dir = tempdir().unwrap();
        let index = NodeFile::open(dir.path().join("books.idx")).unwrap();
        assert_eq!(index.root(), NIL);
        assert_eq!(index.head_empty(), NIL);
        assert_eq!(index.block_count(), 0);
    }

    #[test]
    fn test_node_roundtrip_through_file() {
        let dir = tempdir().unwrap();
        let mut index = NodeFile::open(dir.path().join("books.idx")).unwrap();
        let off = index.allocate().unwrap();
        let node = Node::leaf(10, 8);
        index.write_node(off, &node).unwrap();
        index.flush_header().unwrap();
        assert_eq!(index.read_node(off).unwrap(), node);
    }

    #[test]
    fn test_allocate_appends_then_reuses_old_head() {
        let dir = tempdir().unwrap();
        let mut index = NodeFile::open(dir.path().join("books.idx")).unwrap();

        let a = index.allocate().unwrap();
        index.write_node(a, &Node::leaf(1, 8)).unwrap();
        let b = index.allocate().unwrap();
        index.write_node(b, &Node::leaf(2, 8)).unwrap();
        assert_eq!(a, INDEX_HEADER_SIZE as i32);
        assert_eq!(b, a + NODE_SIZE as i32);
        index.flush_header().unwrap();

        index.release(a).unwrap();
        index.release(b).unwrap();
        index.flush_header().unwrap();

        // The allocator must return the old head and advance past it.
        assert_eq!(index.head_empty(), b);
        assert_eq!(index.allocate().unwrap(), b);
        assert_eq!(index.head_empty(), a);
        assert_eq!(index.allocate().unwrap(), a);
        assert_eq!(index.head_empty(), NIL);
    }

    #[test]
    fn test_read_free_node_as_live_is_corrupt() {
        let dir = tempdir().unwrap();
        let mut index = NodeFile::open(dir.path().join("books.idx")).unwrap();
        let off = index.allocate().unwrap();
        index.write_node(off, &Node::leaf(1, 8)).unwrap();
        index.flush_header().unwrap();
        index.release(off).unwrap();

        match index.read_node(off) {
            Err(LibrisError::CorruptIndex { .. }) => {}
            other => panic!("expected CorruptIndex, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_bounds_child_is_corrupt() {
        let dir = tempdir().unwrap();
        let mut index = NodeFile::open(dir.path().join("books.idx")).unwrap();
        let off = index.allocate().unwrap();
        let mut node = Node::leaf(1, 8);
        node.children[0] = 4096; // past first_empty
        index.write_node(off, &node).unwrap();
        index.flush_header().unwrap();

        match index.read_node(off) {
            Err(LibrisError::CorruptIndex { .. }) => {}
            other => panic!("expected CorruptIndex, got {:?}", other),
        }
    }

    #[test]
    fn test_header_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("books.idx");
        {
            let mut index = NodeFile::open(&path).unwrap();
            let a = index.allocate().unwrap();
            index.write_node(a, &Node::leaf(1, 8)).unwrap();
            index.set_root(a);
            let b = index.allocate().unwrap();
            index.write_node(b, &Node::leaf(2, 8)).unwrap();
            index.release(b).unwrap();
            index.flush_header().unwrap();
        }
        let index = NodeFile::open(&path).unwrap();
        assert_eq!(index.root(), INDEX_HEADER_SIZE as i32);
        assert_eq!(index.block_count(), 2);
        assert_eq!(index.free_list_len().unwrap(), 1);
    }

    #[test]
    fn test_free_list_cycle_detected() {
        let dir = tempdir().unwrap();
        let mut index = NodeFile::open(dir.path().join("books.idx")).unwrap();
        let a = index.allocate().unwrap();
        index.write_node(a, &Node::leaf(1, 8)).unwrap();
        index.flush_header().unwrap();

        // Release twice: the node ends up linked to itself.
        index.release(a).unwrap();
        index.release(a).unwrap();

        match index.free_list_len() {
            Err(LibrisError::CorruptIndex { .. }) => {}
            other => panic!("expected CorruptIndex, got {:?}", other),
        }
    }
}
