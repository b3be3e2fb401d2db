//! Port implementations.

mod memory_store;
mod redis_store;
mod reqwest_client;
mod system_clock;

pub use memory_store::MemoryStore;
pub use redis_store::{RedisStore, connection_url};
pub use reqwest_client::ReqwestHttpClient;
pub use system_clock::SystemClock;
