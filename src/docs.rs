use std::sync::Arc;

use aide::{
    axum::{
        routing::{get, get_with},
        ApiRouter, IntoApiResponse,
    },
    openapi::{OpenApi, Tag},
    redoc::Redoc,
    transform::TransformOpenApi,
};
use axum::{response::IntoResponse, Extension, Json};

pub fn api_docs(api: TransformOpenApi) -> TransformOpenApi {
    api.title("foodcourt-server")
        .summary("NextGen Food Court API")
        .description(include_str!("../README.md"))
        .tag(Tag {
            name: "auth".into(),
            description: Some("Registration, login and session management".into()),
            ..Default::default()
        })
        .tag(Tag {
            name: "users".into(),
            description: Some("User management".into()),
            ..Default::default()
        })
        .tag(Tag {
            name: "cuisines".into(),
            description: Some("Cuisine management".into()),
            ..Default::default()
        })
        .tag(Tag {
            name: "outlets".into(),
            description: Some("Outlet management".into()),
            ..Default::default()
        })
        .tag(Tag {
            name: "menu_items".into(),
            description: Some("Menu item management".into()),
            ..Default::default()
        })
        .tag(Tag {
            name: "orders".into(),
            description: Some("Order management".into()),
            ..Default::default()
        })
        .tag(Tag {
            name: "order_items".into(),
            description: Some("Order item management".into()),
            ..Default::default()
        })
        .tag(Tag {
            name: "tables".into(),
            description: Some("Table management".into()),
            ..Default::default()
        })
        .tag(Tag {
            name: "reservations".into(),
            description: Some("Table reservations".into()),
            ..Default::default()
        })
        .security_scheme(
            "SessionToken",
            aide::openapi::SecurityScheme::Http {
                scheme: "bearer".into(),
                bearer_format: Some("random 256 bit token".into()),
                description: Some("A session token issued by the login endpoint.".into()),
                extensions: Default::default(),
            },
        )
}

pub fn docs_routes() -> ApiRouter {
    // Response inference is only correct for the documentation routes
    // themselves, so it is enabled just for this router.
    aide::gen::infer_responses(true);

    let router = ApiRouter::new()
        .api_route_with(
            "/",
            get_with(
                Redoc::new("/docs/api.json")
                    .with_title("NextGen Food Court")
                    .axum_handler(),
                |op| op.description("This documentation page."),
            ),
            |p| p,
        )
        .route("/api.json", get(serve_docs));

    aide::gen::infer_responses(false);

    router
}

async fn serve_docs(Extension(api): Extension<Arc<OpenApi>>) -> impl IntoApiResponse {
    Json(api).into_response()
}
