//! # HTTP Integration Tests / HTTP 集成测试
//!
//! These tests drive the router in memory: a run request followed by status
//! polls, the plain-text streaming mode, discovery errors surfaced through the
//! payload, and back-to-back run requests.
//!
//! 这些测试在内存中驱动路由：运行请求后的状态轮询、纯文本流式模式、
//! 通过载荷呈现的发现错误，以及紧接着发出的多个运行请求。

mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use webunit::core::config::RunnerConfig;
use webunit::server::{AppState, router};

fn app() -> (Router, AppState) {
    let config = RunnerConfig {
        default_package: common::PACKAGE.to_string(),
        ..RunnerConfig::default()
    };
    let state = AppState::with_storage(common::registry(), config, common::private_slot("http-tests")).unwrap();
    (router(state.clone()), state)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn poll(app: &Router) -> Value {
    let (status, content_type, body) = get(app, "/testresult").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    serde_json::from_str(&body).unwrap()
}

#[cfg(test)]
mod run_tests {
    use super::*;

    #[tokio::test]
    async fn test_idle_before_first_run() {
        let (app, _) = app();
        let json = poll(&app).await;
        assert_eq!(json["svcerr"], 0);
        assert_eq!(json["runs"], "0");
    }

    #[tokio::test]
    async fn test_html_shell_then_poll() {
        let (app, _) = app();

        let (status, content_type, body) = get(&app, "/test?module=test_pair").await;
        assert_eq!(status, StatusCode::OK);
        assert!(content_type.unwrap().starts_with("text/html"));
        assert!(body.contains("testindicator"));
        assert!(body.contains("/testresult"));

        let json = poll(&app).await;
        assert_eq!(json["svcerr"], 0);
        assert_eq!(json["runs"], "2");
        assert_eq!(json["total"], "2");
        assert_eq!(json["errors"], "0");
        assert_eq!(json["failures"], "1");
        assert_eq!(json["details"]["FAIL"].as_array().unwrap().len(), 1);
        assert_eq!(json["details"]["ERROR"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_default_package_runs_everything() {
        let (app, _) = app();
        get(&app, "/test").await;

        let json = poll(&app).await;
        assert_eq!(json["total"], "11");
        assert_eq!(json["runs"], "11");
        assert_eq!(json["errors"], "4");
        assert_eq!(json["failures"], "5");
    }

    #[tokio::test]
    async fn test_missing_module_is_a_service_error_until_next_run() {
        let (app, _) = app();

        let (status, _, body) = get(&app, "/test?module=missing_module").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("testindicator"));

        for _ in 0..2 {
            let json = poll(&app).await;
            assert_eq!(json["svcerr"], 1);
            assert!(json["svcinfo"].as_str().unwrap().contains("missing_module"));
            assert!(json.get("runs").is_none());
        }

        get(&app, "/test?module=test_pair").await;
        let json = poll(&app).await;
        assert_eq!(json["svcerr"], 0);
        assert_eq!(json["runs"], "2");
    }

    #[tokio::test]
    async fn test_conflicting_selectors() {
        let (app, _) = app();
        get(&app, "/test?package=suite&module=test_pair").await;

        let json = poll(&app).await;
        assert_eq!(json["svcerr"], 1);
        assert_eq!(
            json["svcinfo"],
            "parameter 'package' and 'module' cannot be used at the same time"
        );
    }

    #[tokio::test]
    async fn test_detail_escaping_reaches_the_wire() {
        let (app, _) = app();
        get(&app, "/test?module=test_quoting").await;

        let json = poll(&app).await;
        let entry = &json["details"]["FAIL"][0];
        assert_eq!(entry["desc"], "Reports &quot;quoted&quot; text");
        assert_eq!(entry["detail"], "line one<br/>said &quot;no&quot;");
    }
}

#[cfg(test)]
mod plain_format_tests {
    use super::*;

    #[tokio::test]
    async fn test_plain_report_is_streamed() {
        let (app, _) = app();

        let (status, content_type, body) = get(&app, "/test?module=test_pair&format=plain").await;
        assert_eq!(status, StatusCode::OK);
        assert!(content_type.unwrap().starts_with("text/plain"));
        assert!(body.starts_with("===================="));
        assert!(body.contains("WebUnit Test Results"));
        assert!(body.contains(".F"));
        assert!(body.contains("FAIL: test_two_fails (suite.test_pair.PairTest)"));
        assert!(body.contains("Ran 2 tests in"));
        assert!(body.contains("FAILED (failures=1)"));
        assert!(!body.contains("<html"));

        // Plain runs publish too.
        let json = poll(&app).await;
        assert_eq!(json["runs"], "2");
    }

    #[tokio::test]
    async fn test_plain_discovery_error() {
        let (app, _) = app();

        let (_, _, body) = get(&app, "/test?format=plain&module=missing_module").await;
        assert!(body.contains("Module 'missing_module' cannot be found."));
        assert!(!body.contains("Ran "));
    }
}

#[cfg(test)]
mod concurrent_run_tests {
    use super::*;

    fn assert_consistent(json: &Value) {
        match json["total"].as_str() {
            Some("2") => {
                assert_eq!(json["errors"], "0");
                assert_eq!(json["details"]["ERROR"].as_array().unwrap().len(), 0);
                assert!(json["failures"] == "0" || json["failures"] == "1");
            }
            Some("5") => {
                let errors: usize = json["errors"].as_str().unwrap().parse().unwrap();
                let failures: usize = json["failures"].as_str().unwrap().parse().unwrap();
                assert!(errors <= 2 && failures <= 2);
                assert_eq!(json["details"]["ERROR"].as_array().unwrap().len(), errors);
                assert_eq!(json["details"]["FAIL"].as_array().unwrap().len(), failures);
            }
            Some("0") => assert_eq!(json["runs"], "0"),
            other => panic!("unexpected total {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_back_to_back_runs_never_mix() {
        let (app, state) = app();

        let polls = async {
            let mut seen = Vec::new();
            for _ in 0..20 {
                seen.push(poll(&app).await);
                tokio::task::yield_now().await;
            }
            seen
        };
        let (_, _, seen) = tokio::join!(
            get(&app, "/test?module=test_pair"),
            get(&app, "/test?module=test_mixed"),
            polls,
        );

        for json in &seen {
            assert_consistent(json);
        }

        let last = poll(&app).await;
        assert_consistent(&last);
        assert_eq!(last["runs"], last["total"]);
        assert_eq!(state.store.snapshot().run_id, 2);
    }
}
