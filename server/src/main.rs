#![recursion_limit = "256"]

mod genai;
mod routes;
mod services;
mod state;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    // Initialize the generative-AI client (non-fatal: AI features disabled if
    // config missing, the UI still renders).
    let genai = match genai::GenAiClient::from_env() {
        Ok(client) => {
            tracing::info!(
                image_model = client.image_model(),
                text_model = client.text_model(),
                "genai client initialized"
            );
            Some(std::sync::Arc::new(client) as std::sync::Arc<dyn genai::GenAi>)
        }
        Err(e) => {
            tracing::warn!(error = %e, "genai client not configured — AI features disabled");
            None
        }
    };

    let state = state::AppState::new(genai);

    let app = routes::leptos_app(state).expect("router assembly failed");
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "sceneboard listening");
    axum::serve(listener, app).await.expect("server failed");
}
