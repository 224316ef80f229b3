//! IRC message prefix types.

mod serialize;
mod types;

pub use types::{Prefix, PrefixRef};
