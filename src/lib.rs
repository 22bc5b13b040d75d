pub mod app;
pub mod catalog;
pub mod completion;
pub mod config;
pub mod errors;
pub mod filter;
pub mod handlers;
pub mod models;
pub mod state;
pub mod storage;
pub mod ui;
pub mod view;

pub use app::router;
pub use catalog::{load_catalog_state, Catalog, CatalogSource, CatalogState};
pub use completion::CompletionStore;
pub use config::Config;
pub use state::{AppState, Session};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
