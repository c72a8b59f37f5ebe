pub mod auth;
pub mod directory;
pub mod engine;
pub mod limits;
pub mod model;
pub mod notifier;
pub mod observability;
pub mod store;
pub mod wal;
pub mod wire;
