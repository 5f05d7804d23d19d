//! cmpds - compare two datasets for a significant difference
//!
//! This library provides a t-test for unpaired observations whose critical
//! values are computed numerically from the t and standard normal densities,
//! together with the dataset reader and report rendering used by the
//! `cmpds` binary.

pub mod cli;
pub mod dataset;
pub mod report;
pub mod significance;
