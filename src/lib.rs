pub mod codec;
pub mod config;
pub mod model;
pub mod proto;
pub mod queue;
pub mod response;
pub mod router;
pub mod rpc;
pub mod sqlite;
pub mod store;
