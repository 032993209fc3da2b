//! Full integration tests for the Folio API
//!
//! Drives the feed core end to end through mock sources, and the HTTP
//! surface through `axum_test::TestServer` on the real router.
//!
//! Run with: cargo test integration_tests

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::http::{header, HeaderValue, StatusCode};
    use axum_test::TestServer;
    use serde_json::Value;

    use crate::app::feed_controller::{FeedController, RoundOutcome};
    use crate::app::{FeedSessions, FeedSettings};
    use crate::domain::entities::FeedPayload;
    use crate::domain::ports::{ArticleSource, Page, ProjectSource};
    use crate::error::DomainError;
    use crate::test_utils::{
        in_memory_articles, in_memory_projects, test_article_at, test_project_at, ts,
        ScriptedArticleSource, ScriptedProjectSource,
    };
    use crate::{build_router, AppState};

    // ===== feed core =====

    /// Projects page 1 has more; articles are done after one page
    #[tokio::test]
    async fn end_to_end_scenario() {
        let projects = Arc::new(
            ScriptedProjectSource::new()
                .with_page(Page {
                    data: vec![test_project_at("p1", Some(ts("2024-06-10T00:00:00Z")))],
                    last_id: Some("p1".to_string()),
                    has_more: true,
                })
                .with_page(Page {
                    data: vec![test_project_at("p2", Some(ts("2024-06-01T00:00:00Z")))],
                    last_id: Some("p2".to_string()),
                    has_more: false,
                }),
        );
        let articles = Arc::new(ScriptedArticleSource::new().with_page(Page {
            data: vec![test_article_at("a1", Some(ts("2024-06-12T00:00:00Z")))],
            last_id: Some("a1".to_string()),
            has_more: false,
        }));
        let controller =
            FeedController::new(projects.clone(), articles.clone(), FeedSettings::default());

        controller.load_initial().await;

        let view = controller.view();
        let order: Vec<_> = view
            .items
            .iter()
            .map(|item| {
                let is_article = matches!(item.payload, FeedPayload::Article(_));
                (item.id.as_str(), is_article)
            })
            .collect();
        assert_eq!(order, vec![("a1", true), ("p1", false)]);
        assert!(view.has_more);

        let outcome = controller.load_more().await;

        assert_eq!(outcome, RoundOutcome::Applied { added: 1 });
        assert_eq!(projects.call_count(), 2);
        assert_eq!(articles.call_count(), 1);
        assert_eq!(projects.requests()[1].cursor.as_deref(), Some("p1"));
        assert!(!controller.view().has_more);
    }

    /// One failing source fails the whole round; the other's page is dropped
    #[tokio::test]
    async fn failure_isolation_scenario() {
        let projects = Arc::new(
            ScriptedProjectSource::new().with_error(DomainError::Unavailable("503".into())),
        );
        let articles = Arc::new(ScriptedArticleSource::new().with_page(Page {
            data: vec![test_article_at("a1", Some(ts("2024-06-12T00:00:00Z")))],
            last_id: Some("a1".to_string()),
            has_more: true,
        }));
        let controller =
            FeedController::new(projects.clone(), articles.clone(), FeedSettings::default());

        let outcome = controller.load_initial().await;

        assert!(matches!(outcome, RoundOutcome::Failed(_)));
        let view = controller.view();
        assert!(view.items.is_empty());
        assert!(view.error.unwrap().starts_with("Failed to load feed"));
        assert!(!view.is_loading);

        let (project_tracker, article_tracker) = controller.trackers();
        assert_eq!(project_tracker.last_id(), None);
        assert_eq!(article_tracker.last_id(), None);
        assert!(article_tracker.has_more());
    }

    #[tokio::test]
    async fn refresh_matches_fresh_initial_load() {
        let settings = FeedSettings::with_page_size(2);
        let scrolled = FeedController::new(
            Arc::new(in_memory_projects(&["p1", "p2", "p3"])),
            Arc::new(in_memory_articles(&["a1", "a2", "a3"])),
            settings,
        );
        scrolled.load_initial().await;
        scrolled.load_more().await;
        assert_eq!(scrolled.view().items.len(), 6);

        scrolled.refresh().await;

        let fresh = FeedController::new(
            Arc::new(in_memory_projects(&["p1", "p2", "p3"])),
            Arc::new(in_memory_articles(&["a1", "a2", "a3"])),
            settings,
        );
        fresh.load_initial().await;

        assert_eq!(scrolled.view(), fresh.view());
        assert_eq!(scrolled.view().items.len(), 4);
    }

    // ===== HTTP surface =====

    fn server_with(projects: Arc<ProjectSource>, articles: Arc<ArticleSource>) -> TestServer {
        let sessions = Arc::new(FeedSessions::new(
            projects,
            articles,
            FeedSettings::with_page_size(2),
            Duration::from_secs(60),
            10,
        ));
        TestServer::new(build_router(AppState { sessions })).unwrap()
    }

    fn server() -> TestServer {
        server_with(
            Arc::new(in_memory_projects(&["p1", "p2", "p3"])),
            Arc::new(in_memory_articles(&["a1"])),
        )
    }

    fn json() -> HeaderValue {
        HeaderValue::from_static("application/json")
    }

    async fn open_session(server: &TestServer) -> (String, Value) {
        let response = server
            .post("/feeds")
            .add_header(header::ACCEPT, json())
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        let id = body["session_id"].as_str().unwrap().to_string();
        (id, body)
    }

    #[tokio::test]
    async fn router_answers_without_a_server() {
        use axum::body::Body;
        use axum::http::Request;
        use tower::ServiceExt;

        let sessions = Arc::new(FeedSessions::new(
            Arc::new(in_memory_projects(&["p1"])),
            Arc::new(in_memory_articles(&["a1"])),
            FeedSettings::default(),
            Duration::from_secs(60),
            10,
        ));
        let app = build_router(AppState { sessions });

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/feeds/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let server = server();

        let body: Value = server.get("/health").await.json();

        assert_eq!(body["status"], "ok");
        assert_eq!(body["sessions"], 0);
    }

    #[tokio::test]
    async fn open_returns_first_page() {
        let server = server();

        let (_, body) = open_session(&server).await;

        let items = body["feed"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["id"], "p1");
        assert_eq!(items[0]["type"], "project");
        assert!(items[0]["createdAt"].is_string());
        assert_eq!(body["feed"]["hasMore"], true);
        assert_eq!(body["feed"]["error"], Value::Null);
    }

    #[tokio::test]
    async fn more_appends_until_exhausted() {
        let server = server();
        let (id, _) = open_session(&server).await;

        let body: Value = server
            .post(&format!("/feeds/{}/more", id))
            .add_header(header::ACCEPT, json())
            .await
            .json();
        assert_eq!(body["triggered"], true);
        assert_eq!(body["feed"]["items"].as_array().unwrap().len(), 4);
        assert_eq!(body["feed"]["hasMore"], false);

        let body: Value = server
            .post(&format!("/feeds/{}/more", id))
            .add_header(header::ACCEPT, json())
            .await
            .json();
        assert_eq!(body["triggered"], false);
        assert_eq!(body["reason"], "no_more");
    }

    #[tokio::test]
    async fn refresh_returns_first_page_again() {
        let server = server();
        let (id, opened) = open_session(&server).await;
        server
            .post(&format!("/feeds/{}/more", id))
            .add_header(header::ACCEPT, json())
            .await;

        let body: Value = server
            .post(&format!("/feeds/{}/refresh", id))
            .add_header(header::ACCEPT, json())
            .await
            .json();

        assert_eq!(body, opened["feed"]);
    }

    #[tokio::test]
    async fn text_rendering_by_default() {
        let server = server();

        let response = server.post("/feeds").await;

        response.assert_status(StatusCode::CREATED);
        let text = response.text();
        assert!(text.starts_with("Session: "));
        assert!(text.contains("# Feed"));
        assert!(text.contains("1. [PROJECT] Project p1"));
    }

    #[tokio::test]
    async fn failed_load_is_reported_in_view() {
        let server = server_with(
            Arc::new(
                ScriptedProjectSource::new().with_error(DomainError::Unavailable("503".into())),
            ),
            Arc::new(in_memory_articles(&["a1"])),
        );

        let (id, body) = open_session(&server).await;

        assert!(body["feed"]["error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to load feed"));
        server
            .get(&format!("/feeds/{}", id))
            .add_header(header::ACCEPT, json())
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn unknown_and_invalid_sessions() {
        let server = server();

        server
            .get("/feeds/00000000-0000-0000-0000-000000000000")
            .add_header(header::ACCEPT, json())
            .expect_failure()
            .await
            .assert_status(StatusCode::NOT_FOUND);

        server
            .post("/feeds/not-a-uuid/more")
            .expect_failure()
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn close_deletes_session() {
        let server = server();
        let (id, _) = open_session(&server).await;

        server
            .delete(&format!("/feeds/{}", id))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .get(&format!("/feeds/{}", id))
            .expect_failure()
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
