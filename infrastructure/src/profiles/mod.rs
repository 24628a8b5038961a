//! Philosopher profile stores

mod toml_store;

pub use toml_store::TomlProfileStore;
