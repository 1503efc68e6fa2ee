pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use studypoint_common::{
    auth::JwtManager, config::AppConfig, store::CatalogStore, taxonomy::TaxonomyCache,
};

/// Shared state handed to every handler.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
    pub taxonomy: Arc<TaxonomyCache>,
    pub config: Arc<AppConfig>,
    pub jwt: Arc<JwtManager>,
}

impl AppState {
    pub fn new(store: Arc<dyn CatalogStore>, config: Arc<AppConfig>) -> Self {
        let jwt = Arc::new(JwtManager::new(
            &config.auth.jwt_secret,
            config.auth.token_ttl_secs,
        ));
        Self {
            store,
            taxonomy: Arc::new(TaxonomyCache::new()),
            config,
            jwt,
        }
    }
}

/// Creates the configured admin account if it does not exist yet.
/// Without one the admin surface is unreachable, which is fine for a
/// read-only deployment.
pub async fn seed_admin(state: &AppState) -> studypoint_common::errors::Result<()> {
    let (email, password) = match (
        state.config.auth.admin_email.as_deref(),
        state.config.auth.admin_password.as_deref(),
    ) {
        (Some(email), Some(password)) => (email, password),
        _ => {
            tracing::info!("no admin account configured, skipping seed");
            return Ok(());
        }
    };

    if state.store.find_admin_by_email(email).await?.is_some() {
        return Ok(());
    }

    let hash = studypoint_common::auth::hash_password(password)?;
    let admin = state
        .store
        .create_admin(
            email.to_string(),
            state.config.auth.admin_name.clone(),
            hash,
        )
        .await?;
    tracing::info!(admin_id = %admin.id, %email, "seeded admin account");
    Ok(())
}

/// Builds the full application router: public catalog routes, the login
/// endpoint, and the JWT-guarded admin mutations.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut login = post(handlers::auth::login);
    if state.config.rate_limit.enabled {
        let limiter = middleware::rate_limit::GlobalRateLimiter::new(
            state.config.rate_limit.login_per_second,
            state.config.rate_limit.login_burst,
        );
        login = login.layer(axum::middleware::from_fn(
            move |req, next| {
                let limiter = limiter.clone();
                async move { middleware::rate_limit::enforce(limiter, req, next).await }
            },
        ));
    }

    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        .route("/api/auth/login", login)
        .route(
            "/api/resources",
            get(handlers::resources::list_resources).post(handlers::resources::create_resource),
        )
        .route(
            "/api/resources/{id}",
            get(handlers::resources::get_resource)
                .put(handlers::resources::update_resource)
                .delete(handlers::resources::delete_resource),
        )
        .route(
            "/api/fields",
            get(handlers::fields::list_fields).post(handlers::fields::create_field),
        )
        .route(
            "/api/fields/{id}",
            axum::routing::put(handlers::fields::update_field)
                .delete(handlers::fields::delete_field),
        )
        .route(
            "/api/subjects",
            get(handlers::subjects::list_subjects).post(handlers::subjects::create_subject),
        )
        .route(
            "/api/subjects/{id}",
            axum::routing::put(handlers::subjects::update_subject)
                .delete(handlers::subjects::delete_subject),
        )
        .route("/api/semesters", get(handlers::subjects::list_semesters))
        .fallback(handlers::not_found)
        .layer(axum::middleware::from_fn(middleware::track_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}
