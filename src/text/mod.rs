// SPDX-License-Identifier: MPL-2.0
//! Tokenization and frequency counting.

pub mod frequency;
pub mod tokenizer;

pub use frequency::aggregate;
pub use tokenizer::{normalize, Tokenizer};
