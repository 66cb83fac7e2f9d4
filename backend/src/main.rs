use redis::Client as RedisClient;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inffocus_rsvp::{
    build_router, config::Config, services::greetings::GreetingBackend, services::metrics,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let greetings = GreetingBackend::from_config(&config).await?;
    info!("Greeting store: {}", greetings.kind);

    metrics::start(greetings.reader.clone());

    let redis_conn = match &config.redis_url {
        Some(url) => {
            let client = RedisClient::open(url.as_str())?;
            let conn = client.get_multiplexed_async_connection().await?;
            info!("Redis connected, greeting submissions are rate limited");
            Some(conn)
        }
        None => {
            info!("REDIS_URL not set, submission rate limiting disabled");
            None
        }
    };

    let addr = format!("{}:{}", config.host, config.port);

    let mut state = AppState::new(config, greetings);
    if state.config.couple_email.is_some() && state.config.smtp_host.is_none() {
        info!("COUPLE_EMAIL set but SMTP not configured, greeting emails disabled");
    }
    if let Some(conn) = redis_conn {
        state = state.with_redis(conn);
    }

    let app = build_router(state);

    info!("Wedding site listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
