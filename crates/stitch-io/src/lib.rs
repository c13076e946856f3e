//! stitch-io - Point sources and map exporters
//!
//! This crate provides the file-facing collaborators of the stitch
//! point-isolation tool:
//!
//! - **Measurement TXT**: column files written by the measuring machine, one
//!   file per axis, paired by index into (x, y) coordinates
//! - **CSV**: plain `x,y` point tables
//! - **2dxymap**: tabular map files holding nominal, measured and error columns
//!
//! # Design
//!
//! All readers implement the `PointReader` trait and yield plain coordinate
//! pairs. This crate knows nothing about viewports or curves; the core crate
//! adapts its types onto these functions.

pub mod map_export;
pub mod measurement;
pub mod reader;

#[cfg(feature = "csv")]
pub mod csv_reader;

pub use map_export::*;
pub use measurement::*;
pub use reader::*;
