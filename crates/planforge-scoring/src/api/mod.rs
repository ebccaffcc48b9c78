//! Score analysis API.

pub mod analysis;

#[cfg(test)]
mod analysis_tests;
