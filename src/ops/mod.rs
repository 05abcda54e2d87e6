pub mod filter;
pub mod store;
pub mod summary;
pub mod tracker;
