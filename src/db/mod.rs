pub mod cache;
pub mod memory;
pub mod redis;
pub mod store;

mod macros;

pub use self::cache::{Cache, CacheKey, CacheWriterHandle};
pub use self::memory::MemoryStore;
pub use self::redis::{create_redis_client, RedisStore};
pub use self::store::{KeyValueStore, StoreKey};
