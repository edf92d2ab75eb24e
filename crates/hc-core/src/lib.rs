//! # hc-core
//!
//! Core types shared by every histconv crate: the error type and the
//! [`BinValue`] trait describing the per-bin storage precision of a histogram.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod value;

pub use error::{Error, Result};
pub use value::BinValue;
