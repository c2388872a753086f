//! Redis-backed session store for the per-visitor visit counter

use redis::{AsyncCommands, Client};

use crate::{
    config::SessionConfig,
    error::{AppError, AppResult},
};

#[derive(Clone)]
pub struct SessionService {
    client: Client,
    config: SessionConfig,
}

impl SessionService {
    /// Create a new session service and verify the Redis connection
    pub async fn new(url: &str, config: SessionConfig) -> AppResult<Self> {
        let client = Client::open(url)
            .map_err(|e| AppError::Internal(format!("Failed to create Redis client: {}", e)))?;

        // Test connection
        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to connect to Redis: {}", e)))?;

        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| AppError::Internal(format!("Redis connection test failed: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Name of the cookie carrying the session id
    pub fn cookie_name(&self) -> &str {
        &self.config.cookie_name
    }

    /// Increment and return the visit counter for the session.
    ///
    /// Redis INCR creates the key at 0 before incrementing, so a fresh
    /// session observes 1 on its first visit. The key expires with the
    /// session TTL, refreshed on every visit.
    pub async fn increment_visits(&self, session_id: &str) -> AppResult<i64> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to get Redis connection: {}", e)))?;

        let key = format!("session:{}:num_visits", session_id);
        let visits: i64 = conn
            .incr(&key, 1)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to increment visit counter: {}", e)))?;

        conn.expire::<_, ()>(&key, self.config.ttl_seconds as i64)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to refresh session TTL: {}", e)))?;

        Ok(visits)
    }
}
