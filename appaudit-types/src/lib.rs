//! # appaudit-types
//!
//! Core types for application health auditing. This crate defines the time
//! series representation, the pointwise combinators used to derive new series,
//! Top-N selection, and the application model an audit pass consumes.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: Core types work without any serialization framework
//! - **Missing is not zero**: `NaN` marks a point with no sample, and every combinator
//!   documents how it treats it
//! - **Total functions**: Aggregation never panics, whatever the input
//! - **Optional serialization**: Enable the `serde` feature to load and emit JSON
//!
//! ## Features
//!
//! - `serde`: serialization via serde. Series are encoded as arrays of numbers
//!   with `null` for missing samples.
//!
//! ## Example
//!
//! ```rust
//! use appaudit_types::{aggregate, AggregateOp, TimeSeries};
//!
//! let a = TimeSeries::new(vec![1.0, f64::NAN, f64::NAN]);
//! let b = TimeSeries::new(vec![2.0, 3.0, f64::NAN]);
//!
//! let sum = aggregate(AggregateOp::NanSum, 3, [&a, &b]).unwrap();
//! assert_eq!(sum.get(0), 3.0);
//! assert_eq!(sum.get(1), 3.0);
//! assert!(sum.get(2).is_nan());
//! ```

mod aggregate;
mod model;
mod timeseries;
mod top;

pub use aggregate::*;
pub use model::*;
pub use timeseries::*;
pub use top::*;
