//! Database Startup
//!
//! Pool construction and table creation under a bounded retry budget, then
//! the admin identity and sample data.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use auth::PgAdminRepository;
use auth::application::{EnsureAdminInput, EnsureAdminUseCase};
use plots::PgPlotRepository;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use crate::config::AdminConfig;

pub const CONNECT_ATTEMPTS: u32 = 5;
pub const RETRY_DELAY: Duration = Duration::from_secs(2);

const MAX_CONNECTIONS: u32 = 20;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);
const IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Run `op` up to `attempts` times, sleeping `delay` between failures
pub async fn retry<T, E, F, Fut>(attempts: u32, delay: Duration, mut op: F) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < attempts => {
                tracing::warn!(
                    attempt,
                    remaining = attempts - attempt,
                    error = %e,
                    "Database connection failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Open the pool and create the tables, retrying the pair as one unit.
///
/// The first connection is made eagerly so an unreachable store fails here
/// rather than on the first request.
pub async fn connect_with_retry(options: PgConnectOptions) -> anyhow::Result<PgPool> {
    let pool = retry(CONNECT_ATTEMPTS, RETRY_DELAY, |_| {
        let options = options.clone();
        async move {
            let pool = PgPoolOptions::new()
                .max_connections(MAX_CONNECTIONS)
                .acquire_timeout(ACQUIRE_TIMEOUT)
                .idle_timeout(IDLE_TIMEOUT)
                .connect_with(options)
                .await?;
            ensure_schema(&pool).await?;
            anyhow::Ok(pool)
        }
    })
    .await?;

    tracing::info!("Connected to database, schema ready");
    Ok(pool)
}

async fn ensure_schema(pool: &PgPool) -> anyhow::Result<()> {
    PgAdminRepository::new(pool.clone()).ensure_schema().await?;
    PgPlotRepository::new(pool.clone()).ensure_schema().await?;
    Ok(())
}

/// Admin identity, then sample plots (only into an empty table)
pub async fn bootstrap(pool: &PgPool, admin: AdminConfig) -> anyhow::Result<()> {
    EnsureAdminUseCase::new(Arc::new(PgAdminRepository::new(pool.clone())))
        .execute(EnsureAdminInput {
            username: admin.username,
            email: admin.email,
            password: admin.password,
        })
        .await?;

    PgPlotRepository::new(pool.clone()).seed_if_empty().await?;

    Ok(())
}
