// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use ddportal::bots::{build_router, dispatcher::ChatDispatcher};
use ddportal::config::settings::Settings;
use ddportal::domain::services::rate_limiting_service::RateLimiter;
use ddportal::infrastructure::cache::kv_store::KvStore;
use ddportal::infrastructure::cache::memory_store::MemoryStore;
use ddportal::infrastructure::cache::redis_client::RedisClient;
use ddportal::infrastructure::fetches::maps::map_cache;
use ddportal::infrastructure::fetches::players::RankedPlayers;
use ddportal::infrastructure::fetches::servers::server_cache;
use ddportal::infrastructure::repositories::user_repo_impl::UserRepositoryImpl;
use ddportal::presentation::routes::{self, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

use ddportal::utils::telemetry;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting ddportal...");

    // 2. Load configuration
    let settings = Settings::new()?;
    info!("Configuration loaded");

    if settings.metrics.enabled {
        ddportal::infrastructure::metrics::init_metrics(&settings.metrics.addr);
    }

    // 3. Key-value store
    let store: Arc<dyn KvStore> = match settings.redis.url.as_deref() {
        Some(url) => {
            let client = RedisClient::new(url)?;
            info!("Redis client initialized");
            Arc::new(client)
        }
        None => {
            info!("No Redis configured, using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    // 4. Upstream data
    let client = reqwest::Client::builder()
        .user_agent(concat!("ddportal/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let options = settings.fetch.options();
    let maps = Arc::new(map_cache(
        &settings.ddnet.maps_url,
        store.clone(),
        options,
        client.clone(),
    ));
    let servers = Arc::new(server_cache(
        &settings.ddnet.servers_url,
        store.clone(),
        options,
        client.clone(),
    ));
    let players = Arc::new(RankedPlayers::new(
        &settings.ddnet.players_url,
        store.clone(),
        options,
        client,
    ));

    // Player ranks are large, refresh them in the background
    let refresher = players.clone();
    let refresh_interval = Duration::from_secs(settings.ddnet.players_refresh_secs.max(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(refresh_interval);
        loop {
            ticker.tick().await;
            match refresher.refresh().await {
                Ok(fetched) => info!(count = fetched.result.len(), hit = fetched.hit, "Player ranks checked"),
                Err(e) => warn!(error = %e, "Failed to refresh player ranks"),
            }
        }
    });

    // 5. Chat bot
    let users = Arc::new(UserRepositoryImpl::new(store.clone()));
    let router = build_router(users.clone(), maps.clone(), players);
    let chat_limiter = RateLimiter::new(store.clone(), "chat", settings.bot.rate_limit);
    let dispatcher = Arc::new(ChatDispatcher::new(
        router,
        chat_limiter,
        users,
        settings.bot.queue_workers,
    ));
    let web_limiter = Arc::new(RateLimiter::new(store, "web", settings.web.rate_limit));

    if settings.bot.admin_token.is_none() {
        info!("No admin token configured, bot admin modes disabled");
    }

    // 6. Start HTTP server
    let state = AppState {
        dispatcher,
        maps,
        servers,
        admin_token: settings.bot.admin_token.clone(),
    };
    let app = routes::routes(state, web_limiter);

    let addr = settings.listen_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
