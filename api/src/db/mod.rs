pub mod session;

pub use session::{Probe, ScopedSession, SessionProvider};

use axum::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool, Postgres};
use std::str::FromStr;
use std::time::Instant;

use crate::config::Settings;
use crate::error::{ConfigFault, ProbeFault, SetupFault};

#[derive(Clone)]
pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build a pool without opening any connection.
    ///
    /// Connections are established on first acquisition, so the process starts (and answers
    /// liveness) even while the database is down.
    pub fn connect_lazy(settings: &Settings) -> Result<Self, ConfigFault> {
        let mut options = PgConnectOptions::from_str(&settings.database_url)
            .map_err(|e| ConfigFault::InvalidDatabaseUrl(e.to_string()))?;
        if !settings.debug {
            options = options.disable_statement_logging();
        }

        let pool = PgPoolOptions::new()
            .max_connections(settings.db_pool_max)
            .acquire_timeout(settings.db_acquire_timeout)
            .connect_lazy_with(options);

        Ok(Self::new(pool))
    }

    /// Log current pool metrics
    pub fn log_pool_metrics(&self, context: &str) {
        let size = self.pool.size();
        let num_idle = self.pool.num_idle();
        let active = size.saturating_sub(num_idle as u32);

        tracing::debug!(
            pool_size = size,
            idle_connections = num_idle,
            active_connections = active,
            "Connection pool metrics {}",
            context
        );
    }
}

#[async_trait]
impl SessionProvider for Database {
    type Handle = PoolConnection<Postgres>;

    async fn acquire(&self) -> Result<Self::Handle, SetupFault> {
        let start = Instant::now();
        match self.pool.acquire().await {
            Ok(conn) => {
                let elapsed = start.elapsed();
                if elapsed.as_millis() > 10 {
                    tracing::warn!(
                        acquisition_time_ms = elapsed.as_millis(),
                        "Slow connection acquisition detected"
                    );
                } else {
                    tracing::debug!(
                        acquisition_time_ms = elapsed.as_millis(),
                        "Connection acquisition time"
                    );
                }
                Ok(conn)
            }
            Err(e) => {
                let elapsed = start.elapsed();
                tracing::error!(
                  acquisition_time_ms = elapsed.as_millis(),
                  error = %e,
                  "Failed to acquire connection"
                );
                Err(SetupFault::Unreachable(e.to_string()))
            }
        }
    }

    fn release(&self, handle: Self::Handle) {
        // The handle still counts as active here; the pool reclaims it on a spawned task
        self.log_pool_metrics("before release");
        // Nothing is committed on release
        drop(handle);
    }
}

#[async_trait]
impl Probe for PoolConnection<Postgres> {
    async fn probe(&mut self) -> Result<(), ProbeFault> {
        sqlx::query("SELECT 1")
            .execute(&mut **self)
            .await
            .map(|_| ())
            .map_err(|e| ProbeFault(e.to_string()))
    }
}
