//! Auth domain for Course Compass: password hashing, the storage seam,
//! credential and session stores, the session resolver, and the route
//! gatekeeper's decision logic.

pub mod auth;
pub mod error;
pub mod store;
