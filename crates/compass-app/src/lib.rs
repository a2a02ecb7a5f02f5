pub mod app;
pub mod codec_handler;
pub mod config;
pub mod cookie;
pub mod error;
pub mod middleware;
pub mod store_handler;
