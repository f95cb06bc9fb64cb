//! Unicode helpers for building filters
//!
//! This module provides:
//! - Latin script classification
//! - NFD / NFC transformers for accented Latin-1 letters
//! - Ready-made predicates for [`remove`](crate::transform::remove)

pub mod norm;
pub mod script;

pub use norm::{Nfc, Nfd};
pub use script::is_latin;

/// Predicate selecting everything outside the Latin script
pub fn is_not_latin(c: char) -> bool {
    !is_latin(c)
}

/// Predicate selecting combining diacritical marks (U+0300..U+036F)
pub fn is_combining_mark(c: char) -> bool {
    matches!(c, '\u{0300}'..='\u{036F}')
}
