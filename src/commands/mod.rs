//! CLI command implementations.

pub mod search;
pub mod serve;
pub mod stores;

pub use search::SearchCommand;
pub use serve::ServeCommand;
pub use stores::list_stores;
