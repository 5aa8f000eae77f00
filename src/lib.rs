//! xcstrings-editor
//!
//! Document model and synchronization engine for editing Xcode String
//! Catalogs (`.xcstrings`): a typed catalog model, an editable item tree with
//! review state, per-user overlay annotations and filtered views.

pub mod cli;
pub mod config;
pub mod document;
pub mod editor;
pub mod item;
pub mod overlay;
pub mod translate;
pub mod tree;
pub mod view;
pub mod workspace;

#[cfg(test)]
mod test_utils;

pub use document::{
    Document,
    Language,
};
pub use editor::{
    Editor,
    Session,
};
pub use item::{
    EditItem,
    ItemId,
    State,
};
