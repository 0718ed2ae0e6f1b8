use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

mod cache;
mod clock;
mod config;
mod data;
mod error;
mod model;
mod server;

use cache::{CacheStore, WeeklyTtlPolicy};
use clock::{Clock, SystemClock};
use config::Config;
use data::models::CachedValue;
use data::{StatsProvider, SyntheticProvider, Tank01Provider};
use server::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // The data source is an explicit startup choice, never a per-request
    // fallback: a configured key means live data, no key means synthetic.
    let provider: Arc<dyn StatsProvider> = match config.tank01_api_key.as_deref() {
        Some(key) => {
            info!("🟢 LIVE data source - Tank01 at {}", config.tank01_base_url);
            Arc::new(Tank01Provider::new(key, &config.tank01_base_url)?)
        }
        None => {
            warn!("🟡 TANK01_API_KEY not set - serving SYNTHETIC data");
            Arc::new(SyntheticProvider::new(config.season_start))
        }
    };

    let policy = WeeklyTtlPolicy::default();
    let cache: CacheStore<CachedValue> = CacheStore::new(policy, clock.clone());
    info!(
        "Weekly cache boundary: entries written now expire at {}",
        policy.next_boundary(clock.now())
    );

    // Background hygiene sweep. Lazy expiry already hides stale entries;
    // this just reclaims their memory.
    {
        let cache = cache.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(3600));
            loop {
                interval.tick().await;
                let purged = cache.purge_expired().await;
                if purged > 0 {
                    info!("Purged {} expired cache entries", purged);
                }
            }
        });
    }

    let state = AppState {
        config: config.clone(),
        provider,
        cache,
        clock,
    };
    let app = server::router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    info!("API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
