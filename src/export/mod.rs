// SPDX-License-Identifier: MPL-2.0
//! Exporting a generated cloud with its legend.

pub mod composite;
pub mod legend;

pub use composite::{composite, save_composite, ExportFormat, ExportOptions};
pub use legend::{legend_lines, render_legend};
