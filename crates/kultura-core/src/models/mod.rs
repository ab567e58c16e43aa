//! Data models for the preview service

mod image_process;

pub use image_process::*;
