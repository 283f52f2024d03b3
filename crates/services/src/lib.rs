pub mod credential_store;
pub mod export;
pub mod page_context;
