pub mod storage;

pub use storage::{InMemoryStore, JsonFileStore, KeyValueStore};
