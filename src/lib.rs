// SPDX-License-Identifier: MPL-2.0
//! `cloud_lens` turns a text column of a spreadsheet into a word cloud.
//!
//! The pipeline loads a sheet, filters its rows by excluded column values,
//! tokenizes mixed Latin/Han text, counts word frequencies, renders them into
//! a square, rectangular or circular cloud and exports the cloud next to a
//! text legend.

#![doc(html_root_url = "https://docs.rs/cloud_lens/0.3.0")]

pub mod cloud;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod export;
pub mod logging;
pub mod paths;
pub mod session;
pub mod text;

pub use cloud::{CloudArtifact, ColorScheme, GlyphSource};
pub use domain::{CellValue, FrequencyMap, ShapeKind, ShapeSpec, Table};
pub use error::{Error, Result, Warning};
pub use session::{GenerateRequest, Session};
