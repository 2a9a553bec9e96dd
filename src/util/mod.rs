#[macro_use]
mod macros;

mod clip;

pub(crate) use clip::*;
