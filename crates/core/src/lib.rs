#![forbid(unsafe_code)]

pub mod hint;
pub mod model;
pub mod time;

pub use hint::hint_from;
pub use time::{Clock, fixed_clock, fixed_now};
