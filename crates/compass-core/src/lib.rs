//! Shared foundation for the Course Compass auth core: configuration,
//! error types, route constants, and the identifier codec.

pub mod config;
pub mod constants;
pub mod error;
pub mod util;
