//! Conversion between catalogs and edit trees.
mod build;
mod write;

pub use build::build;
pub use write::write;
