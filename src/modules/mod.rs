pub mod accounts;
pub mod books;

use shelfmark_kernel::ModuleRegistry;

/// Register all application modules with the registry
pub fn register_all(registry: &mut ModuleRegistry) {
    registry.register(accounts::create_module());
    registry.register(books::create_module());
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, Response, StatusCode};
    use axum::Router;
    use axum_login::AuthManagerLayerBuilder;
    use shelfmark_kernel::settings::Settings;
    use shelfmark_kernel::InitCtx;
    use tower::ServiceExt;
    use tower_sessions::{MemoryStore, SessionManagerLayer};

    async fn test_app() -> Router {
        // A single connection keeps the in-memory database alive.
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        let mut registry = ModuleRegistry::new();
        register_all(&mut registry);
        shelfmark_db::apply_migrations(&pool, &registry.collect_migrations())
            .await
            .unwrap();

        let settings = Settings::default();
        let ctx = InitCtx {
            settings: &settings,
            db: &pool,
        };

        let session_layer = SessionManagerLayer::new(MemoryStore::default()).with_secure(false);
        let auth_layer =
            AuthManagerLayerBuilder::new(accounts::Backend::new(pool.clone()), session_layer)
                .build();

        shelfmark_http::build_router(&registry, &ctx).layer(auth_layer)
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn form_post(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn body_string(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn register(app: &Router, username: &str, password: &str) {
        let body = format!(
            "username={username}&password={password}&password_confirm={password}"
        );
        let response = app
            .clone()
            .oneshot(form_post("/register", &body, None))
            .await
            .unwrap();
        assert!(response.status().is_redirection());
    }

    async fn login(app: &Router, username: &str, password: &str) -> String {
        let body = format!("username={username}&password={password}");
        let response = app
            .clone()
            .oneshot(form_post("/login", &body, None))
            .await
            .unwrap();
        assert!(response.status().is_redirection());

        response
            .headers()
            .get(header::SET_COOKIE)
            .expect("login should set a session cookie")
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn unauthenticated_listing_redirects_to_login() {
        let app = test_app().await;

        let response = app.oneshot(get("/", None)).await.unwrap();
        assert!(response.status().is_redirection());

        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert!(location.starts_with("/login"));
    }

    #[tokio::test]
    async fn duplicate_registration_re_renders_the_form() {
        let app = test_app().await;
        register(&app, "alice", "hunter2").await;

        let response = app
            .clone()
            .oneshot(form_post(
                "/register",
                "username=alice&password=other&password_confirm=other",
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("already taken"));
    }

    #[tokio::test]
    async fn invalid_registration_re_renders_with_messages() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(form_post(
                "/register",
                "username=alice&password=one&password_confirm=two",
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response)
            .await
            .contains("passwords do not match"));
    }

    #[tokio::test]
    async fn full_book_lifecycle_for_one_user() {
        let app = test_app().await;
        register(&app, "alice", "hunter2").await;
        let cookie = login(&app, "alice", "hunter2").await;

        // Empty listing to start.
        let response = app.clone().oneshot(get("/", Some(&cookie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let page = body_string(response).await;
        assert!(page.contains("alice"));
        assert!(!page.contains("Dune"));

        // Create an entry; it appears uncompleted.
        let response = app
            .clone()
            .oneshot(form_post("/", "title=Dune", Some(&cookie)))
            .await
            .unwrap();
        assert!(response.status().is_redirection());

        let response = app.clone().oneshot(get("/", Some(&cookie))).await.unwrap();
        let page = body_string(response).await;
        assert!(page.contains("Dune"));
        assert!(!page.contains("<s>Dune</s>"));

        // Toggle on, then back off.
        let response = app
            .clone()
            .oneshot(get("/toggle/1", Some(&cookie)))
            .await
            .unwrap();
        assert!(response.status().is_redirection());

        let response = app.clone().oneshot(get("/", Some(&cookie))).await.unwrap();
        assert!(body_string(response).await.contains("<s>Dune</s>"));

        let response = app
            .clone()
            .oneshot(get("/toggle/1", Some(&cookie)))
            .await
            .unwrap();
        assert!(response.status().is_redirection());

        let response = app.clone().oneshot(get("/", Some(&cookie))).await.unwrap();
        assert!(!body_string(response).await.contains("<s>Dune</s>"));

        // Delete, then further toggles miss even for the owner.
        let response = app
            .clone()
            .oneshot(get("/delete/1", Some(&cookie)))
            .await
            .unwrap();
        assert!(response.status().is_redirection());

        let response = app.clone().oneshot(get("/", Some(&cookie))).await.unwrap();
        assert!(!body_string(response).await.contains("Dune"));

        let response = app
            .clone()
            .oneshot(get("/toggle/1", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn users_cannot_touch_each_others_entries() {
        let app = test_app().await;
        register(&app, "alice", "hunter2").await;
        register(&app, "bob", "swordfish").await;

        let alice = login(&app, "alice", "hunter2").await;
        let bob = login(&app, "bob", "swordfish").await;

        let response = app
            .clone()
            .oneshot(form_post("/", "title=Dune", Some(&alice)))
            .await
            .unwrap();
        assert!(response.status().is_redirection());

        // Alice's entry is invisible to bob and unreachable by id.
        let response = app.clone().oneshot(get("/", Some(&bob))).await.unwrap();
        assert!(!body_string(response).await.contains("Dune"));

        let response = app
            .clone()
            .oneshot(get("/toggle/1", Some(&bob)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .clone()
            .oneshot(get("/delete/1", Some(&bob)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // And it is still there, unchanged, for alice.
        let response = app.clone().oneshot(get("/", Some(&alice))).await.unwrap();
        let page = body_string(response).await;
        assert!(page.contains("Dune"));
        assert!(!page.contains("<s>Dune</s>"));
    }

    #[tokio::test]
    async fn empty_titles_are_rejected() {
        let app = test_app().await;
        register(&app, "alice", "hunter2").await;
        let cookie = login(&app, "alice", "hunter2").await;

        let response = app
            .clone()
            .oneshot(form_post("/", "title=+++", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = app
            .clone()
            .oneshot(form_post("/", "", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
