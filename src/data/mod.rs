pub mod config;
pub mod image_loader;
