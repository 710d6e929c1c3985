//! Render module - chart planning and PNG output

pub mod charts;
pub mod geometry;
pub mod plotter;

pub use charts::*;
pub use geometry::*;
pub use plotter::*;
