pub mod analyzer;
pub mod config;
pub mod error;
pub mod pose;
pub mod protocol;
pub mod swing;
pub mod video;
