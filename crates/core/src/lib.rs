#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod permute;
pub mod time;

pub use error::Error;
pub use permute::permute_with_index_tracking;
pub use time::Clock;
