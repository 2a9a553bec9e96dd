//! Values that stay within bounds.
//!
//! A [`BoundedValue`] wraps a value and behaves like it for reading,
//! comparing, hashing and formatting.
//! Every mutation is followed by a clamp,
//! either against an optional minimum and maximum ([`MinMax`])
//! or through a custom clamp function ([`Custom`], [`CustomWith`]).

#[macro_use]
extern crate failure;
extern crate log;
extern crate num_traits;
extern crate serde;

#[macro_use]
mod util;

mod core;

pub use crate::core::bounded::{BoundedValue, BoundsError};
pub use crate::core::ops::{InPlace, InPlaceOp, OperatorError};
pub use crate::core::policy::{ClampPolicy, Custom, CustomWith, MinMax};
pub use crate::core::width::Width;
