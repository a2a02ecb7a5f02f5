//! Course Compass - integration test support.
//!
//! This crate re-exports the workspace crates to support integration tests
//! that use `compass::` paths.

#![allow(ambiguous_glob_reexports)]

pub mod component {
    // Re-export core and service modules at the component level
    pub use compass_core::*;
    pub use compass_service::*;

    // Re-export db crate with all its public modules
    pub mod db {
        pub use compass_db::db::*;
    }

    // Re-export models
    pub mod model {
        pub use compass_db::model::*;
    }

    // Re-export app middleware and handlers
    pub mod middleware {
        pub use compass_app::middleware::*;
    }

    // Re-export config from both core and app
    pub mod config {
        pub use compass_app::config::ConfigHandler;
        pub use compass_core::config::*;
    }
}

// Re-export top-level modules for convenience
pub mod app {
    pub use compass_app::*;

    pub mod api {
        pub use compass_app::app::api::*;
    }
}
