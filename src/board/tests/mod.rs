//! Board module tests.
//!
//! Tests are organized into separate files by category:
//! - `perft.rs` - Leaf counts against published reference values
//! - `make_unmake.rs` - Apply/reverse restores every tracked field
//! - `edge_cases.rs` - Pins, en passant corner cases, check evasion
//! - `proptest.rs` - Property-based tests

mod edge_cases;
mod proptest;
