use std::sync::Arc;

use aide::openapi::OpenApi;
use axum::http::{header, HeaderValue, Method};
use axum::Extension;
use log::{error, info};
use tower_http::cors::CorsLayer;

use crate::database::AppState;

mod api;
mod database;
mod docs;
mod env;
mod error;
mod models;
mod request_state;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    aide::gen::on_error(|err| {
        error!("Api documentation error: {err}");
    });
    aide::gen::extract_schemas(true);

    let app_state = AppState::connect(env::DATABASE_URL.as_str()).await;

    let allowed_origins = env::CORS_ALLOWED_ORIGINS
        .split(',')
        .filter_map(|origin| origin.trim().parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    let mut open_api = OpenApi::default();
    let router = api::init(app_state)
        .nest_api_service("/docs", docs::docs_routes())
        .finish_api_with(&mut open_api, docs::api_docs)
        .layer(Extension(Arc::new(open_api)))
        .layer(cors);

    let address = format!("{}:{}", env::API_HOST.as_str(), env::API_PORT.as_str());
    info!("Listening on {address}");

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .expect("bind to address");
    axum::serve(listener, router.into_make_service())
        .await
        .expect("start server");
}
