//! Redis-backed document store.
//!
//! Redis key patterns (`{ns}` is the configured `DB_NAME`):
//! - `{ns}:doc:{collection}:{id}` — document (JSON STRING)
//! - `{ns}:idx:{collection}` — SET of ids present in the collection

use super::{DocumentStore, StoreError};
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

/// SET NX the document and, only if it was written, add its id to the index.
const INSERT_SCRIPT: &str = r#"
if redis.call('SET', KEYS[1], ARGV[1], 'NX') then
    redis.call('SADD', KEYS[2], ARGV[2])
    return 1
end
return 0
"#;

/// Shared connection handle, opened once at startup.
///
/// `MultiplexedConnection` is cheap to clone; each operation works on its
/// own clone of the same underlying connection.
#[derive(Clone)]
pub struct RedisStore {
    con: MultiplexedConnection,
    namespace: String,
}

impl RedisStore {
    /// Open a client and verify the connection.
    pub async fn connect(redis_url: &str, namespace: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url)?;
        let con = client.get_multiplexed_async_connection().await?;
        Ok(Self {
            con,
            namespace: namespace.to_string(),
        })
    }

    fn doc_key(&self, collection: &str, id: &str) -> String {
        format!("{}:doc:{}:{}", self.namespace, collection, id)
    }

    fn index_key(&self, collection: &str) -> String {
        format!("{}:idx:{}", self.namespace, collection)
    }
}

#[async_trait]
impl DocumentStore for RedisStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<String>, StoreError> {
        let mut con = self.con.clone();
        let doc: Option<String> = con.get(self.doc_key(collection, id)).await?;
        Ok(doc)
    }

    async fn insert(&self, collection: &str, id: &str, doc: &str) -> Result<bool, StoreError> {
        let mut con = self.con.clone();
        let script = redis::Script::new(INSERT_SCRIPT);
        let inserted: i64 = script
            .key(self.doc_key(collection, id))
            .key(self.index_key(collection))
            .arg(doc)
            .arg(id)
            .invoke_async(&mut con)
            .await?;
        Ok(inserted == 1)
    }

    async fn replace(&self, collection: &str, id: &str, doc: &str) -> Result<bool, StoreError> {
        let mut con = self.con.clone();
        // SET ... XX replies nil when the key does not exist
        let reply: Option<String> = redis::cmd("SET")
            .arg(self.doc_key(collection, id))
            .arg(doc)
            .arg("XX")
            .query_async(&mut con)
            .await?;
        Ok(reply.is_some())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let mut con = self.con.clone();
        let (deleted, _removed): (i64, i64) = redis::pipe()
            .atomic()
            .del(self.doc_key(collection, id))
            .srem(self.index_key(collection), id)
            .query_async(&mut con)
            .await?;
        Ok(deleted > 0)
    }

    async fn list(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        let mut con = self.con.clone();
        let ids: Vec<String> = con.smembers(self.index_key(collection)).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = ids.iter().map(|id| self.doc_key(collection, id)).collect();
        let docs: Vec<Option<String>> = redis::cmd("MGET").arg(&keys).query_async(&mut con).await?;

        // Ids whose document vanished between SMEMBERS and MGET come back nil
        Ok(docs.into_iter().flatten().collect())
    }
}
