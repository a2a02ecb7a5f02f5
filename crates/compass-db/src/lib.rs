//! Diesel-backed storage for the Course Compass auth core: the `users` and
//! `user_sessions` relations, their models, and low-level queries.
//!
//! Schema creation and migration are out of scope; this crate assumes the
//! two relations exist.

pub mod db;
pub mod error;
pub mod model;
