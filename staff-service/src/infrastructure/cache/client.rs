use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use serde::{Serialize, de::DeserializeOwned};

/// JSON-over-Redis cache. Every failure is logged and treated as a miss so a
/// Redis outage never fails a request.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    namespace: String,
}

impl RedisCache {
    pub async fn connect(redis_url: &str, namespace: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        tracing::info!(namespace, "Connected to Redis cache");

        Ok(Self {
            conn,
            namespace: namespace.to_string(),
        })
    }

    /// Full key for `suffix`, e.g. `staff-service:staff:all`.
    pub fn key(&self, suffix: &str) -> String {
        format!("{}:{suffix}", self.namespace)
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut conn = self.conn.clone();
        let output: Result<Option<String>, _> = conn.get(key).await;

        match output {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(value) => {
                    tracing::debug!("Cache hit: {key}");
                    Some(value)
                }
                Err(e) => {
                    tracing::warn!("Cache entry for {key} is unreadable: {e}");
                    None
                }
            },
            Ok(None) => {
                tracing::debug!("Cache miss: {key}");
                None
            }
            Err(e) => {
                tracing::warn!("Cache get error for {key}: {e}");
                None
            }
        }
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl_seconds: u64) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Cache serialize error for {key}: {e}");
                return;
            }
        };

        let mut conn = self.conn.clone();
        let output: Result<(), _> = conn.set_ex(key, json, ttl_seconds).await;
        if let Err(e) = output {
            tracing::warn!("Cache set error for {key}: {e}");
        }
    }

    pub async fn delete(&self, keys: &[String]) {
        if keys.is_empty() {
            return;
        }
        let mut conn = self.conn.clone();
        let output: Result<(), _> = conn.del(keys).await;
        if let Err(e) = output {
            tracing::warn!("Cache delete error for {keys:?}: {e}");
        }
    }
}
