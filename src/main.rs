//! Updeck core service entrypoint.

use std::sync::Arc;

use updeck_core::{router, AppConfig, CoreServices};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "updeck_core=debug,info".into()),
        )
        .init();

    let config = AppConfig::from_env();

    let pool = sqlx::PgPool::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let bind_addr = config.bind_addr.clone();
    let services = Arc::new(CoreServices::new(pool, config));
    let app = router(services);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!("Updeck core listening on {}", bind_addr);
    axum::serve(listener, app).await.expect("Server error");
}
