use redis::AsyncCommands;
use redis::Client;
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::error::AppError;
use crate::error::AppResult;
use crate::models::MovieId;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    MovieDetails(MovieId),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::MovieDetails(id) => write!(f, "details:{}", id),
        }
    }
}

/// Creates a Redis client for caching
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Message for asynchronous cache writes
struct CacheWriteMessage {
    key: String,
    value: String,
}

#[derive(Clone)]
struct RedisLayer {
    client: Client,
    write_tx: mpsc::UnboundedSender<CacheWriteMessage>,
    timeout: Duration,
}

/// Process-lifetime cache for serialized values
///
/// Entries live in memory until the process exits; nothing expires. When a
/// Redis client is attached, writes are mirrored to Redis by a background task
/// and memory misses fall back to Redis, so several instances share entries.
#[derive(Clone)]
pub struct Cache {
    memory: Arc<RwLock<HashMap<String, String>>>,
    redis: Option<RedisLayer>,
}

/// Handle for gracefully shutting down the cache writer
pub struct CacheWriterHandle {
    shutdown_tx: Option<mpsc::Sender<()>>,
}

impl CacheWriterHandle {
    /// Initiates a graceful shutdown of the cache writer
    ///
    /// Sends a shutdown signal to the writer task, which flushes all pending
    /// writes to Redis before exiting. No-op for a memory-only cache.
    pub async fn shutdown(self) {
        if let Some(tx) = self.shutdown_tx {
            let _ = tx.send(()).await;
            tracing::info!("Cache writer shutdown signal sent");
        }
    }
}

impl Cache {
    /// Creates a cache that only lives in process memory
    pub fn in_memory() -> (Self, CacheWriterHandle) {
        let cache = Self {
            memory: Arc::new(RwLock::new(HashMap::new())),
            redis: None,
        };

        (cache, CacheWriterHandle { shutdown_tx: None })
    }

    /// Creates a cache backed by Redis with an async write background task
    ///
    /// This spawns a background task that processes Redis writes asynchronously,
    /// preventing cache operations from blocking API responses. Every Redis
    /// round trip, read or write, is bounded by `timeout`.
    pub async fn with_redis(redis_client: Client, timeout: Duration) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        tokio::spawn(async move {
            Self::cache_writer_task(client, timeout, write_rx, shutdown_rx).await;
        });

        let cache = Self {
            memory: Arc::new(RwLock::new(HashMap::new())),
            redis: Some(RedisLayer {
                client: redis_client,
                write_tx,
                timeout,
            }),
        };

        let handle = CacheWriterHandle {
            shutdown_tx: Some(shutdown_tx),
        };

        (cache, handle)
    }

    /// Background task that processes cache write messages
    ///
    /// On shutdown, drains whatever is already queued and exits.
    async fn cache_writer_task(
        client: Client,
        timeout: Duration,
        mut write_rx: mpsc::UnboundedReceiver<CacheWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Cache writer task started");

        loop {
            tokio::select! {
                Some(msg) = write_rx.recv() => {
                    if let Err(e) = Self::write_to_redis(&client, timeout, msg).await {
                        tracing::error!(error = %e, "Failed to write to Redis cache");
                    }
                }
                _ = shutdown_rx.recv() => {
                    let mut flushed = 0;
                    while let Ok(msg) = write_rx.try_recv() {
                        if let Err(e) = Self::write_to_redis(&client, timeout, msg).await {
                            tracing::error!(error = %e, "Failed to flush cache write during shutdown");
                        } else {
                            flushed += 1;
                        }
                    }

                    tracing::info!(flushed = flushed, "Cache writer task stopped");
                    break;
                }
            }
        }
    }

    /// Writes a single message to Redis
    async fn write_to_redis(
        client: &Client,
        timeout: Duration,
        msg: CacheWriteMessage,
    ) -> AppResult<()> {
        let write = async move {
            let mut conn = client.get_multiplexed_async_connection().await?;
            let _: () = conn.set(msg.key, msg.value).await?;
            Ok::<_, AppError>(())
        };

        tokio::time::timeout(timeout, write)
            .await
            .map_err(|_| AppError::Internal("Redis write timed out".to_string()))?
    }

    /// Reads one key from Redis, treating a slow server as a miss
    async fn read_from_redis(redis: &RedisLayer, key: &str) -> AppResult<Option<String>> {
        let read = async {
            let mut conn = redis.client.get_multiplexed_async_connection().await?;
            let value: Option<String> = conn.get(key).await?;
            Ok::<_, AppError>(value)
        };

        match tokio::time::timeout(redis.timeout, read).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    key = %key,
                    timeout_ms = redis.timeout.as_millis() as u64,
                    "Redis read timed out, treating as miss"
                );
                Ok(None)
            }
        }
    }

    /// Retrieves a value from the cache by key
    ///
    /// Checks process memory first, then Redis when configured. A Redis hit is
    /// copied into memory so later lookups stay local.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let key = key.to_string();

        let local = self
            .memory
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();

        let json = match (local, &self.redis) {
            (Some(json), _) => json,
            (None, Some(redis)) => {
                match Self::read_from_redis(redis, &key).await? {
                    Some(json) => {
                        self.memory
                            .write()
                            .unwrap_or_else(PoisonError::into_inner)
                            .insert(key, json.clone());
                        json
                    }
                    None => return Ok(None),
                }
            }
            (None, None) => return Ok(None),
        };

        let data = serde_json::from_str(&json)
            .map_err(|e| AppError::Internal(format!("Cache deserialization error: {}", e)))?;
        Ok(Some(data))
    }

    /// Stores a value without blocking on Redis
    ///
    /// The memory layer is updated immediately; the Redis write, if any, is
    /// handed to the background writer.
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let key = key.to_string();
        self.memory
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone(), json.clone());

        if let Some(redis) = &self.redis {
            let msg = CacheWriteMessage { key, value: json };
            if let Err(e) = redis.write_tx.send(msg) {
                tracing::error!(error = %e, "Failed to send cache write message");
            }
        }
    }

    /// Number of entries held in process memory
    pub fn len(&self) -> usize {
        self.memory
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
