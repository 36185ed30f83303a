pub mod http;
pub mod memory;
pub mod store;

pub use http::HttpDocumentStore;
pub use memory::MemoryDocumentStore;
pub use store::{DocumentStore, ListQuery, ListResult, StoreError};
