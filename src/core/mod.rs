pub mod bounded;
pub mod ops;
pub mod policy;
mod serialize;
pub mod width;
