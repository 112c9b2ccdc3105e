//! A distributed lock held as one Redis key. The key's value identifies the holder, so the
//! same holder may lock again (refreshing the expiry) and only the holder may release it.

mod error;

pub use crate::error::{LockError, LockErrorExt};
pub use jtool_domain::config::LockConfig;

use redis::aio::{ConnectionLike, MultiplexedConnection};
use redis::Script;
use std::fmt;
use tracing::{debug, instrument};

/// Reply both scripts return on success.
pub const SUCCESS_REPLY: &str = "OK";

/// `KEYS[1]` lock key, `ARGV[1]` holder value, `ARGV[2]` expiry in seconds.
pub const LOCK_SCRIPT: &str = r"
if redis.call('EXISTS', KEYS[1]) == 0 then
    return redis.call('SET', KEYS[1], ARGV[1], 'NX', 'EX', ARGV[2])
end
if redis.call('GET', KEYS[1]) == ARGV[1] then
    return redis.call('SET', KEYS[1], ARGV[1], 'XX', 'EX', ARGV[2])
else
    return 'FAIL'
end
";

/// `KEYS[1]` lock key, `ARGV[1]` holder value.
pub const RELEASE_SCRIPT: &str = r"
if redis.call('EXISTS', KEYS[1]) == 0 then
    return 'OK'
end
if redis.call('GET', KEYS[1]) == ARGV[1] then
    if redis.call('DEL', KEYS[1]) == 1 then
        return 'OK'
    end
end
return 'FAIL'
";

#[derive(Clone)]
pub struct RedisLock<C = MultiplexedConnection> {
    conn: C,
    lock_script: Script,
    release_script: Script,
    default_expire: u64,
}

impl<C> fmt::Debug for RedisLock<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisLock").field("default_expire", &self.default_expire).finish_non_exhaustive()
    }
}

impl RedisLock<MultiplexedConnection> {
    /// # Errors
    /// [`LockError::Redis`] for a malformed URL or when the server is unreachable.
    pub async fn connect(config: &LockConfig) -> Result<Self, LockError> {
        let client = redis::Client::open(config.url.as_str()).context(config.url.clone())?;
        let conn = client.get_multiplexed_async_connection().await.context("connect")?;
        Ok(Self::new(conn).with_default_expire(config.expire_seconds))
    }
}

impl<C> RedisLock<C>
where
    C: ConnectionLike + Clone + Send,
{
    pub fn new(conn: C) -> Self {
        Self {
            conn,
            lock_script: Script::new(LOCK_SCRIPT),
            release_script: Script::new(RELEASE_SCRIPT),
            default_expire: LockConfig::default().expire_seconds,
        }
    }

    #[must_use]
    pub const fn with_default_expire(mut self, seconds: u64) -> Self {
        self.default_expire = seconds;
        self
    }

    /// Takes the lock or refreshes it when `value` already holds it.
    ///
    /// # Errors
    /// [`LockError::InvalidArgument`] for a zero expiry, [`LockError::Redis`] when the script
    /// call fails.
    #[instrument(skip(self, value), err)]
    pub async fn try_lock(&self, key: &str, value: &str, expire_seconds: u64) -> Result<bool, LockError> {
        if expire_seconds == 0 {
            return Err(LockError::InvalidArgument {
                message: "expire seconds must be positive".into(),
                context: Some(key.to_owned().into()),
            });
        }

        let mut conn = self.conn.clone();
        let reply: Option<String> = self
            .lock_script
            .key(key)
            .arg(value)
            .arg(expire_seconds)
            .invoke_async(&mut conn)
            .await
            .context(key.to_owned())?;

        let locked = reply.as_deref() == Some(SUCCESS_REPLY);
        debug!(locked, "Lock attempt");
        Ok(locked)
    }

    /// [`Self::try_lock`] with the configured expiry.
    ///
    /// # Errors
    /// As [`Self::try_lock`].
    pub async fn lock(&self, key: &str, value: &str) -> Result<bool, LockError> {
        self.try_lock(key, value, self.default_expire).await
    }

    /// Deletes the key when `value` holds it. A missing key counts as released.
    ///
    /// # Errors
    /// [`LockError::Redis`] when the script call fails.
    #[instrument(skip(self, value), err)]
    pub async fn release(&self, key: &str, value: &str) -> Result<bool, LockError> {
        let mut conn = self.conn.clone();
        let reply: Option<String> = self
            .release_script
            .key(key)
            .arg(value)
            .invoke_async(&mut conn)
            .await
            .context(key.to_owned())?;

        let released = reply.as_deref() == Some(SUCCESS_REPLY);
        debug!(released, "Lock release");
        Ok(released)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redis::{Cmd, Pipeline, RedisFuture, Value};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers every command with the same reply.
    #[derive(Clone)]
    struct Scripted {
        reply: Value,
        calls: Arc<AtomicUsize>,
    }

    impl Scripted {
        fn new(reply: Value) -> Self {
            Self { reply, calls: Arc::new(AtomicUsize::new(0)) }
        }
    }

    impl ConnectionLike for Scripted {
        fn req_packed_command<'a>(&'a mut self, _cmd: &'a Cmd) -> RedisFuture<'a, Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let reply = self.reply.clone();
            Box::pin(async move { Ok(reply) })
        }

        fn req_packed_commands<'a>(
            &'a mut self,
            _cmd: &'a Pipeline,
            _offset: usize,
            _count: usize,
        ) -> RedisFuture<'a, Vec<Value>> {
            Box::pin(async { Ok(Vec::new()) })
        }

        fn get_db(&self) -> i64 {
            0
        }
    }

    #[tokio::test]
    async fn test_ok_reply_means_locked() {
        let lock = RedisLock::new(Scripted::new(Value::Okay));
        assert!(lock.try_lock("order:1", "worker-a", 10).await.unwrap());
        assert!(lock.release("order:1", "worker-a").await.unwrap());
    }

    #[tokio::test]
    async fn test_nil_or_fail_reply_means_not_locked() {
        let lock = RedisLock::new(Scripted::new(Value::Nil));
        assert!(!lock.try_lock("order:1", "worker-b", 10).await.unwrap());

        let lock = RedisLock::new(Scripted::new(Value::BulkString(b"FAIL".to_vec())));
        assert!(!lock.try_lock("order:1", "worker-b", 10).await.unwrap());
        assert!(!lock.release("order:1", "worker-b").await.unwrap());
    }

    #[tokio::test]
    async fn test_zero_expire_is_rejected_before_any_command() {
        let conn = Scripted::new(Value::Okay);
        let calls = conn.calls.clone();
        let lock = RedisLock::new(conn);

        let err = lock.try_lock("order:1", "worker-a", 0).await.unwrap_err();
        assert!(matches!(err, LockError::InvalidArgument { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_lock_uses_default_expire() {
        let lock = RedisLock::new(Scripted::new(Value::Okay)).with_default_expire(0);
        assert!(lock.lock("k", "v").await.is_err());
    }

    #[test]
    fn test_scripts_reference_keys_and_args() {
        assert!(LOCK_SCRIPT.contains("'NX', 'EX', ARGV[2]"));
        assert!(LOCK_SCRIPT.contains("'XX', 'EX', ARGV[2]"));
        assert!(RELEASE_SCRIPT.contains("redis.call('DEL', KEYS[1])"));
    }
}
