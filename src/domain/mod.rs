// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core data types with ZERO external dependencies.
//!
//! This module contains pure value types shared by the pipeline stages.
//! It depends on nothing but `std` so the types stay trivially testable.
//!
//! # Modules
//!
//! - [`frequency`]: Token counts ([`FrequencyMap`](frequency::FrequencyMap))
//! - [`shape`]: Canvas geometry ([`ShapeSpec`](shape::ShapeSpec),
//!   [`ShapeKind`](shape::ShapeKind))
//! - [`table`]: Loaded sheet data ([`Table`](table::Table),
//!   [`CellValue`](table::CellValue))

pub mod frequency;
pub mod shape;
pub mod table;

pub use frequency::FrequencyMap;
pub use shape::{ShapeKind, ShapeSpec};
pub use table::{CellKey, CellValue, Table};
