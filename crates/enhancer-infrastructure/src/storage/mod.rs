//! Storage layer: file-backed key-value store.

mod json_file_store;

pub use json_file_store::JsonFileStore;
