use axum::Router;
use dotenvy::dotenv;
use tokio::net::TcpListener;

use eventitude_server::config::Config;
use eventitude_server::db;
use eventitude_server::routes::create_routes;
use eventitude_server::state::AppState;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env();

    let pool = db::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Successfully connected to database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    tracing::info!("Migrations run successfully");

    let bind_addr = config.bind_addr.clone();
    let app: Router = create_routes(AppState::new(pool, config));

    tracing::info!("Server running at http://{}", bind_addr);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
