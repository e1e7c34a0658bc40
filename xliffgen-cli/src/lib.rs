//! CLI library for testing purposes

pub mod config;
pub mod generate;
pub mod sync;
pub mod validation;
pub mod view;

pub use generate::GenerateOptions;
