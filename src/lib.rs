//! Auto-EDA: Exploratory Data Analysis Library
//!
//! Loads the automobile pricing dataset, normalises missing values,
//! computes descriptive statistics and correlations, and renders charts.

pub mod cli;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod utils;
