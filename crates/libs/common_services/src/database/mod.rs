mod data_store;
mod error;
mod memory_store;
mod pg_store;
mod retry;
mod stores;
mod tables;

pub use data_store::*;
pub use error::*;
pub use memory_store::*;
pub use pg_store::*;
pub use retry::*;
pub use stores::*;
pub use tables::*;
