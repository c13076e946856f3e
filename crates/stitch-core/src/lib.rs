//! stitch-core - Point isolation and curve reconstruction engine
//!
//! This crate provides the core functionality for stitch, a tool that walks a
//! square viewport across a 2D measurement grid, isolates points one at a
//! time by zooming in, and groups the isolated points into per-row curves.
//!
//! # Key Components
//!
//! - **Viewport**: Square view box with pan and zoom, clamped at a minimum radius
//! - **Visibility**: Inclusive containment tests and single-point isolation
//! - **Collector**: Row buffer of recorded points, deduplicated and sorted by x
//! - **Curves**: Append-only store of completed rows
//! - **Controller**: Tick-driven state machine for automated scans
//! - **Session**: Owns all of the above and exposes the control surface
//! - **Export**: 2dxymap, JSON and CSV output of collected curves
//!
//! # Scan Cycle
//!
//! Each tick shrinks the viewport by `step_distance`. At the zoom floor the
//! cell is decided, the radius is restored and the camera steps one column
//! right. After `points_per_row` cells the camera returns to the row start,
//! steps one row, and the buffered points become a curve:
//!
//! ```text
//! Idle -> Narrowing -> RowStepping -> RowComplete -> ... -> SessionComplete
//! ```

pub mod collector;
pub mod command;
pub mod config;
pub mod controller;
pub mod curves;
pub mod error;
pub mod export;
pub mod grid;
pub mod input;
pub mod session;
pub mod types;
pub mod viewport;
pub mod visibility;

pub use collector::*;
pub use command::*;
pub use config::*;
pub use controller::*;
pub use curves::*;
pub use error::*;
pub use grid::*;
pub use session::*;
pub use types::*;
pub use viewport::*;
pub use visibility::*;

// export and input are accessed via their module prefix
