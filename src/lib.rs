//! Library exports for the ezshot screenshot tool.
//!
//! The binary is a thin CLI over these modules. Each step of the
//! capture → caption → upload → deliver pipeline sits behind a trait in
//! [`pipeline::dependencies`] so it can be swapped out in tests.

pub mod caption;
pub mod capture;
pub mod config;
pub mod input;
pub mod logging;
pub mod notification;
pub mod pipeline;
pub mod sink;
pub mod upload;

pub use config::Config;
