// src/routes.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers::*;
use crate::htmx_handlers::*;
use crate::state::AppState;

pub fn router(app_state: AppState) -> Router {
    let static_dir = ServeDir::new(&app_state.config.static_dir);
    let sites_dir = ServeDir::new(&app_state.config.sites_dir);
    let body_limit = app_state.config.max_content_length;

    Router::new()
        .route("/", get(index_handler))
        .route("/create", post(create_microsite_handler))
        .route("/preview/{slug}", get(preview_handler))
        .route("/download/{slug}", get(download_handler))
        .route("/htmx/form/products", post(add_product_htmx_handler))
        .route(
            "/htmx/form/products/{key}",
            delete(remove_product_htmx_handler),
        )
        .route("/htmx/form/theme/{theme}", post(select_theme_htmx_handler))
        .route(
            "/htmx/form/preview/{field}",
            post(preview_image_htmx_handler),
        )
        .nest_service("/static", static_dir)
        .nest_service("/sites", sites_dir)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::db;
    use crate::form::preview::png_fixture;
    use crate::session::FORM_HEADER;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use tower::ServiceExt;

    const BOUNDARY: &str = "XBUILDERBOUNDARYX";

    async fn test_app(root: &std::path::Path) -> Router {
        let config = AppConfig::for_root(root);
        let pool = db::connect(&config.database_url).await.unwrap();
        router(AppState::new(pool, config))
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn set_cookie(response: &Response, name: &str) -> Option<String> {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with(&format!("{}=", name)))
            .map(|v| v.split(';').next().unwrap_or_default().to_string())
    }

    fn form_id_of(html: &str) -> String {
        let start = html.find(r#"data-form-id=""#).expect("form id") + r#"data-form-id=""#.len();
        let len = html[start..].find('"').unwrap();
        html[start..start + len].to_string()
    }

    /// Loads the builder page and returns the id of its form.
    async fn open_builder(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        form_id_of(&body_string(response).await)
    }

    async fn add_block(app: &Router, form_id: &str) -> String {
        let response = app
            .clone()
            .oneshot(
                Request::post("/htmx/form/products")
                    .header(FORM_HEADER, form_id)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        body_string(response).await
    }

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, Vec<u8>),
    }

    fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File(name, filename, bytes) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                            name, filename
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    fn multipart_request(uri: &str, form_id: Option<&str>, htmx: bool, body: Vec<u8>) -> Request<Body> {
        let mut builder = Request::post(uri).header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        );
        if let Some(form_id) = form_id {
            builder = builder.header(FORM_HEADER, form_id);
        }
        if htmx {
            builder = builder.header("HX-Request", "true");
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn index_starts_a_form_with_one_block() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path()).await;
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        let html = body_string(response).await;
        assert!(html.contains("Product 1"));
        assert!(!html.contains("Product 2"));
        assert!(!form_id_of(&html).is_empty());
    }

    #[tokio::test]
    async fn two_tabs_keep_separate_block_lists() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path()).await;
        let tab_a = open_builder(&app).await;
        add_block(&app, &tab_a).await;

        let tab_b = open_builder(&app).await;
        assert_ne!(tab_a, tab_b);

        let html = add_block(&app, &tab_a).await;
        assert!(html.contains(r#"id="product-3""#));
        assert!(html.contains("Product 3"));

        let html = add_block(&app, &tab_b).await;
        assert!(html.contains(r#"id="product-2""#));
        assert!(html.contains("Product 2"));
    }

    #[tokio::test]
    async fn fragments_require_a_session() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path()).await;
        let response = app
            .clone()
            .oneshot(Request::post("/htmx/form/products").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::GONE);

        let response = app
            .oneshot(
                Request::post("/htmx/form/products")
                    .header(FORM_HEADER, uuid::Uuid::new_v4().to_string())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::GONE);
    }

    #[tokio::test]
    async fn adding_and_removing_blocks_relabels_headers() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path()).await;
        let form_id = open_builder(&app).await;

        let html = add_block(&app, &form_id).await;
        assert!(html.contains(r#"id="product-2""#));
        assert!(html.contains("Product 2"));
        assert!(html.contains(r#"id="product-head-1""#));
        assert!(html.contains(r#"hx-swap-oob="true""#));

        let response = app
            .clone()
            .oneshot(
                Request::delete("/htmx/form/products/1")
                    .header(FORM_HEADER, &form_id)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("product-head-2"));
        assert!(html.contains("Product 1"));
        assert!(html.contains("display: none"));

        let response = app
            .oneshot(
                Request::delete("/htmx/form/products/2")
                    .header(FORM_HEADER, &form_id)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn theme_selection_marks_one_option() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path()).await;
        let form_id = open_builder(&app).await;

        let response = app
            .clone()
            .oneshot(
                Request::post("/htmx/form/theme/fancy")
                    .header(FORM_HEADER, &form_id)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let html = body_string(response).await;
        assert!(html.contains(r#"value="fancy" checked"#));
        assert_eq!(html.matches("checked").count(), 1);

        let response = app
            .oneshot(
                Request::post("/htmx/form/theme/neon")
                    .header(FORM_HEADER, &form_id)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn image_preview_shows_thumbnail_or_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path()).await;
        let form_id = open_builder(&app).await;

        let body = multipart_body(&[Part::File("logo", "logo.png", png_fixture(300, 100))]);
        let response = app
            .clone()
            .oneshot(multipart_request("/htmx/form/preview/logo", Some(&form_id), true, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("data:image/png;base64,"));

        let body = multipart_body(&[Part::File("product_image_1", "broken.png", b"nope".to_vec())]);
        let response = app
            .oneshot(multipart_request("/htmx/form/preview/product-1", Some(&form_id), true, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn create_rejects_missing_business_name() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path()).await;
        let form_id = open_builder(&app).await;

        let body = multipart_body(&[
            Part::Text("business_name", "   "),
            Part::Text("product_key", "1"),
            Part::Text("product_name", "Widget"),
        ]);
        let response = app
            .oneshot(multipart_request("/create", Some(&form_id), true, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let trigger = response.headers().get("HX-Trigger").unwrap().to_str().unwrap();
        assert!(trigger.contains("Please enter a business name"));
        let html = body_string(response).await;
        assert!(html.contains(r#"id="submitBtn""#));
        assert!(!html.contains("disabled"));
    }

    #[tokio::test]
    async fn plain_post_without_products_flashes_and_redirects() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path()).await;

        let body = multipart_body(&[
            Part::Text("business_name", "Acme"),
            Part::Text("product_name", "  "),
        ]);
        let response = app
            .oneshot(multipart_request("/create", None, false, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
        assert!(set_cookie(&response, "flash").is_some());
    }

    #[tokio::test]
    async fn valid_submission_builds_site_preview_and_archive() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path()).await;
        let form_id = open_builder(&app).await;

        let body = multipart_body(&[
            Part::Text("business_name", "Acme Tools"),
            Part::Text("tagline", "Built to last"),
            Part::Text("theme", "modern"),
            Part::File("logo", "logo.png", png_fixture(40, 20)),
            Part::Text("product_key", "1"),
            Part::Text("product_name", "Hammer"),
            Part::Text("product_price", "19.99"),
            Part::Text("product_description", "Steel head"),
            Part::File("product_image_1", "hammer.png", png_fixture(20, 20)),
        ]);
        let response = app
            .clone()
            .oneshot(multipart_request("/create", Some(&form_id), true, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("hx-redirect").unwrap(), "/preview/acme_tools");
        let flash = set_cookie(&response, "flash").unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::get("/preview/acme_tools")
                    .header(header::COOKIE, &flash)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Microsite created successfully!"));

        let response = app
            .clone()
            .oneshot(Request::get("/sites/acme_tools/products.html").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Hammer"));
        assert!(html.contains("$19.99"));

        let response = app
            .oneshot(Request::get("/download/acme_tools").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "application/zip");
        assert_eq!(
            response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"acme_tools_microsite.zip\""
        );
    }

    #[tokio::test]
    async fn unknown_site_redirects_with_flash() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path()).await;

        let response = app
            .clone()
            .oneshot(Request::get("/preview/nowhere").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(set_cookie(&response, "flash").is_some());

        let response = app
            .oneshot(Request::get("/download/nowhere").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
