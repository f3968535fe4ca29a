use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ideon_api::{
    config::Config,
    middleware::{auth, logging},
    routes::{analyze, auth as auth_routes, chat, health, ideas},
    state::AppState,
};
use ideon_agent::{IdeaChatAgent, Evaluator, TavilyClient};
use ideon_llm::ClientFactory;
use ideon_persist::PersistClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config =
        Config::load().map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    // Initialize logging
    init_logging(&config);

    tracing::info!("Starting Ideon API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    // Initialize LLM client
    tracing::info!(provider = %config.llm.provider, model = %config.llm.model, "Initializing LLM client");
    let provider_config = config
        .provider_config()
        .map_err(|e| anyhow::anyhow!("Invalid LLM provider configuration: {}", e))?;
    let llm_client = ClientFactory::create_chat_client(provider_config)?;

    // Initialize search client
    let search_client = Arc::new(TavilyClient::new(config.tavily_api_key.clone())?);

    // Initialize persistence client
    tracing::info!("Connecting to MongoDB");
    let persist_client = PersistClient::connect(&config.mongodb_uri, &config.mongodb.database).await?;
    persist_client.ping().await?;
    tracing::info!("MongoDB connected");

    // Build evaluation pipeline and chat agent
    let evaluator = Evaluator::new(llm_client.clone(), search_client, config.llm.model.clone())
        .with_temperature(config.llm.temperature)
        .with_max_search_results(config.search.max_results);
    let chat_agent = IdeaChatAgent::new(llm_client, config.llm.model.clone())
        .with_temperature(config.llm.temperature);

    // Create application state
    let state = AppState::new(config.clone(), persist_client, evaluator, chat_agent);

    // Build router
    let app = build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: AppState) -> Router {
    // Routes reachable without a token
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/auth/register", post(auth_routes::register))
        .route("/auth/login", post(auth_routes::login))
        .route("/auth/forgot-password", post(auth_routes::forgot_password))
        .route("/auth/reset-password", post(auth_routes::reset_password));

    // Routes behind JWT auth
    let protected_routes = Router::new()
        .route("/auth/me", get(auth_routes::me))
        // Evaluation
        .route("/analyze/single", post(analyze::analyze_single))
        .route("/analyze/csv", post(analyze::analyze_batch))
        // Ideas
        .route("/ideas/", get(ideas::list_ideas))
        .route("/ideas/", delete(ideas::delete_all_ideas))
        .route("/ideas/lookup", get(ideas::lookup_idea))
        .route("/ideas/top", get(ideas::top_ideas))
        .route("/ideas/overall_top", get(ideas::overall_top_ideas))
        .route("/ideas/data", get(ideas::idea_data))
        .route("/ideas/analytics", get(ideas::idea_analytics))
        .route("/ideas/:id", get(ideas::get_idea))
        .route("/ideas/:id", delete(ideas::delete_idea))
        .route("/ideas/:id/history", get(ideas::idea_history))
        // Chat
        .route("/chat/idea/:id", post(chat::chat_with_idea))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    // Build full router with middleware
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(logging::log_request))
        .layer(TimeoutLayer::new(std::time::Duration::from_secs(300))) // batch evaluations are slow
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.cors.enabled {
        let mut cors = CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any);

        if config.cors.origins.iter().any(|o| o == "*") {
            cors = cors.allow_origin(Any);
        } else {
            for origin in &config.cors.origins {
                if let Ok(parsed_origin) = origin.parse::<axum::http::HeaderValue>() {
                    cors = cors.allow_origin(parsed_origin);
                }
            }
        }

        cors
    } else {
        CorsLayer::permissive()
    }
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry.with(tracing_subscriber::fmt::layer()).init();
        }
    }
}
