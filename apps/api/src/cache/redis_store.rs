use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client};

use super::{CacheEntry, CacheError, CacheStore};

const KEY_PREFIX: &str = "skillpath:";

/// Redis-backed store. The full entry JSON is stored so validity checks stay
/// in `TtlCache`; the Redis `EX` is only there to reclaim memory.
pub struct RedisStore {
    client: Client,
}

impl RedisStore {
    pub fn open(url: &str) -> Result<Self, CacheError> {
        Ok(Self {
            client: Client::open(url)?,
        })
    }

    async fn connection(&self) -> Result<MultiplexedConnection, CacheError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }
}

fn prefixed(key: &str) -> String {
    format!("{KEY_PREFIX}{key}")
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn load(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = conn.get(prefixed(key)).await?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn store(&self, entry: CacheEntry) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        let raw = serde_json::to_string(&entry)?;
        redis::cmd("SET")
            .arg(prefixed(&entry.key))
            .arg(raw)
            .arg("EX")
            .arg(entry.ttl_seconds.max(1))
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        redis::cmd("DEL")
            .arg(prefixed(key))
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(format!("{KEY_PREFIX}*"))
            .query_async(&mut conn)
            .await?;
        if keys.is_empty() {
            return Ok(());
        }
        redis::cmd("DEL")
            .arg(keys)
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_prefixed() {
        assert_eq!(prefixed("skills:data scientist"), "skillpath:skills:data scientist");
    }

    #[test]
    fn test_open_rejects_malformed_url() {
        assert!(RedisStore::open("not a url").is_err());
    }
}
