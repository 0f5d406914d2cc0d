//! Embedded front-end. The page, its script, and its stylesheet ship inside
//! the binary so the service is a single deployable.

use axum::{
    http::header::CONTENT_TYPE,
    response::{Html, IntoResponse},
};

const INDEX_HTML: &str = include_str!("../../assets/index.html");
const APP_JS: &str = include_str!("../../assets/app.js");
const STYLES_CSS: &str = include_str!("../../assets/styles.css");

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn app_js() -> impl IntoResponse {
    ([(CONTENT_TYPE, "application/javascript; charset=utf-8")], APP_JS)
}

pub async fn styles_css() -> impl IntoResponse {
    ([(CONTENT_TYPE, "text/css; charset=utf-8")], STYLES_CSS)
}
