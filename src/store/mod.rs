//! Durable preview-set store
//!
//! The store file is the single source of truth: every mutation is a
//! load-mutate-save cycle, safe under this tool's single-writer model.

pub mod persistence;
pub mod schema;

pub use persistence::PreviewStoreFile;
pub use schema::{PreviewSet, PreviewSetPatch, PreviewStore, SettingsPatch, StoreSettings};
