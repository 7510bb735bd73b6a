pub mod corpus;
pub mod redis;

pub use self::corpus::Corpus;
pub use self::redis::create_redis_client;
pub use self::redis::Cache;
pub use self::redis::CacheKey;
pub use self::redis::CacheWriterHandle;
