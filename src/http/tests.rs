#[cfg(test)]
mod tests {
    use crate::config::ApiConfig;
    use crate::error::ClientError;
    use crate::http::testing::{respond, Harness, Step};
    use crate::http::{with_query, RequestOptions, RequestPolicy};
    use crate::session::{KeyValueStore, PROFILE_KEY, TOKEN_KEY};
    use reqwest::header::{HeaderValue, ACCEPT};
    use reqwest::Method;
    use serde::Deserialize;
    use serde_json::{json, Value};
    use std::time::Duration;
    use tokio::time::Instant;

    #[derive(Debug, Deserialize)]
    struct Alert {
        id: String,
        severity: String,
    }

    #[tokio::test(start_paused = true)]
    async fn test_bearer_token_attached_when_stored() {
        let harness = Harness::new(vec![respond(200, "[]")]);
        harness.ctx.credentials().set_token("tok-abc.123").unwrap();

        let _: Value = harness.client("AlertService").get("/alerts").await.unwrap();

        let sent = harness.transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].header("authorization"), Some("Bearer tok-abc.123"));
        assert_eq!(sent[0].url, "http://backend/api/v1/alerts");
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_authorization_without_credential() {
        let harness = Harness::new(vec![respond(200, "{}")]);

        let _: Value = harness.client("AlertService").get("/alerts").await.unwrap();

        let sent = harness.transport.requests();
        assert!(sent[0].header("authorization").is_none());
        assert_eq!(sent[0].header("content-type"), Some("application/json"));
        assert_eq!(sent[0].header("accept"), Some("application/json"));
        assert!(!sent[0].has_body());
    }

    #[tokio::test(start_paused = true)]
    async fn test_header_overrides_merge_with_defaults() {
        let harness = Harness::new(vec![respond(200, "{}")]);
        let options = RequestOptions::new(Method::GET)
            .header(ACCEPT, HeaderValue::from_static("text/csv"));

        let _: Value = harness.client("AuditLogService").request("/audit-logs/export", options).await.unwrap();

        let sent = &harness.transport.requests()[0];
        assert_eq!(sent.header("accept"), Some("text/csv"));
        assert_eq!(sent.header("content-type"), Some("application/json"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_gateway_statuses_retry_exactly_once() {
        for status in [502u16, 503, 504] {
            let harness = Harness::new(vec![
                respond(status, ""),
                respond(status, ""),
                respond(200, "{}"),
            ]);
            harness.ctx.credentials().set_token("tok").unwrap();

            let started = Instant::now();
            let result: Result<Value, ClientError> = harness
                .client("TicketService")
                .post("/tickets", &json!({"title": "disk full"}))
                .await;

            let err = result.unwrap_err();
            assert_eq!(err.status(), Some(status));
            assert!(err.to_string().starts_with(&format!("HTTP Error: {}", status)));
            assert!(started.elapsed() >= Duration::from_millis(1000));

            let sent = harness.transport.requests();
            assert_eq!(sent.len(), 2, "status {} must be sent twice", status);
            assert_eq!(sent[0], sent[1]);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_statuses_are_not_retried() {
        for status in [400u16, 403, 404, 409, 500] {
            let harness = Harness::new(vec![respond(status, ""), respond(200, "{}")]);

            let result: Result<Value, ClientError> = harness.client("DeviceService").get("/devices").await;

            assert_eq!(result.unwrap_err().status(), Some(status));
            assert_eq!(harness.transport.requests().len(), 1, "status {} must not retry", status);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticket_recovers_after_one_retry() {
        let harness = Harness::new(vec![respond(503, ""), respond(200, r#"{"id":"t1"}"#)]);

        let started = Instant::now();
        let ticket: Value = harness.client("TicketService").get("/tickets/t1").await.unwrap();

        assert_eq!(ticket, json!({"id": "t1"}));
        assert!(started.elapsed() >= Duration::from_millis(1000));
        assert_eq!(harness.transport.requests().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_alert_list_decodes_typed() {
        let harness = Harness::new(vec![respond(200, r#"[{"id":"a1","severity":"critical"}]"#)]);

        let alerts: Vec<Alert> = harness.client("AlertService").get("/alerts").await.unwrap();

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].id, "a1");
        assert_eq!(alerts[0].severity, "critical");
    }

    #[tokio::test(start_paused = true)]
    async fn test_unauthorized_clears_session() {
        let harness = Harness::new(vec![respond(401, r#"{"error":"invalid credentials"}"#)]);
        harness.ctx.credentials().set_token("stale").unwrap();
        harness.ctx.credentials().set_profile(&json!({"username": "ops"})).unwrap();

        let result: Result<Value, ClientError> = harness
            .client("AuthService")
            .post("/login", &json!({"username": "ops", "password": "wrong"}))
            .await;

        let err = result.unwrap_err();
        assert!(err.is_session_expired());
        assert_eq!(err.to_string(), "Session expired. Please login again.");
        assert_eq!(harness.store.get(TOKEN_KEY), None);
        assert_eq!(harness.store.get(PROFILE_KEY), None);
        assert_eq!(harness.expired_count(), 1);
        assert_eq!(harness.transport.requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_unauthorized_calls_both_expire() {
        let harness = Harness::new(vec![respond(401, ""), respond(401, "")]);
        harness.ctx.credentials().set_token("stale").unwrap();
        harness.ctx.credentials().set_profile(&json!({"username": "ops"})).unwrap();
        let alerts = harness.client("AlertService");
        let tickets = harness.client("TicketService");

        let (first, second) = tokio::join!(
            alerts.get::<Value>("/alerts"),
            tickets.get::<Value>("/tickets"),
        );

        assert!(first.unwrap_err().is_session_expired());
        assert!(second.unwrap_err().is_session_expired());
        assert_eq!(harness.store.get(TOKEN_KEY), None);
        assert_eq!(harness.store.get(PROFILE_KEY), None);
        assert_eq!(harness.expired_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unauthorized_wins_over_unparseable_body() {
        let harness = Harness::new(vec![respond(503, ""), respond(401, "<html>nope</html>")]);
        harness.ctx.credentials().set_token("stale").unwrap();

        let result: Result<Value, ClientError> = harness.client("AlertService").get("/alerts").await;

        assert!(matches!(result, Err(ClientError::SessionExpired)));
        assert!(!harness.ctx.credentials().is_authenticated());
        assert_eq!(harness.expired_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_message_from_server_body() {
        let harness = Harness::new(vec![
            respond(404, r#"{"message":"Alert not found"}"#),
            respond(422, r#"{"detail":"severity is invalid"}"#),
            respond(500, "Internal failure"),
        ]);
        let client = harness.client("AlertService");

        let not_found = client.get::<Value>("/alerts/missing").await.unwrap_err();
        assert_eq!(not_found.to_string(), "Alert not found");

        let invalid = client.patch::<Value, _>("/alerts/a1", &json!({"severity": "x"})).await.unwrap_err();
        assert_eq!(invalid.to_string(), "severity is invalid");

        let generic = client.get::<Value>("/alerts").await.unwrap_err();
        assert_eq!(generic.to_string(), "HTTP Error: 500 Internal Server Error");

        let errors = harness.ctx.loggers().sink().by_level(crate::logging::LogLevel::Error);
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0].data.as_ref().unwrap()["status"], 404);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_success_body_is_empty_object() {
        let harness = Harness::new(vec![respond(204, ""), respond(200, "  \n")]);
        let client = harness.client("TicketService");

        let deleted: Value = client.delete("/tickets/t1").await.unwrap();
        assert_eq!(deleted, json!({}));

        let blank: Value = client.get("/tickets/t2").await.unwrap();
        assert_eq!(blank, json!({}));
    }

    #[tokio::test(start_paused = true)]
    async fn test_post_body_round_trip() {
        let payload = json!({"title": "Core switch down", "priority": "high", "tags": ["network"]});
        let harness = Harness::new(vec![respond(201, &payload.to_string())]);

        let created: Value = harness.client("TicketService").post("/tickets", &payload).await.unwrap();

        assert_eq!(created, payload);
        let sent = &harness.transport.requests()[0];
        assert_eq!(sent.method, Method::POST);
        let body: Value = serde_json::from_slice(sent.body.as_ref().unwrap()).unwrap();
        assert_eq!(body, payload);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_gets_are_independent() {
        let harness = Harness::new(vec![respond(200, "[]"), respond(200, "[]")]);
        let client = harness.client("AlertService");

        let _: Value = client.get("/alerts").await.unwrap();
        let _: Value = client.get("/alerts").await.unwrap();

        assert_eq!(harness.transport.requests().len(), 2);
        let sink = harness.ctx.loggers().sink();
        let starts = sink
            .by_category("AlertService")
            .into_iter()
            .filter(|e| e.message == "GET /alerts")
            .count();
        assert_eq!(starts, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fails_at_configured_window() {
        let harness = Harness::new(vec![Step::Hang]);

        let started = Instant::now();
        let result: Result<Value, ClientError> = harness.client("TopologyService").get("/topology").await;
        let elapsed = started.elapsed();

        let err = result.unwrap_err();
        assert!(matches!(err, ClientError::Timeout { .. }));
        assert_eq!(err.to_string(), "Request timed out. Please check your connection and try again.");
        assert!(elapsed >= Duration::from_millis(30_000));
        assert!(elapsed < Duration::from_millis(31_000));

        let logged = harness.ctx.loggers().sink().by_level(crate::logging::LogLevel::Error);
        assert_eq!(logged[0].data.as_ref().unwrap()["timeout_ms"], 30_000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_rearmed_for_retry() {
        let harness = Harness::new(vec![
            Step::Delayed(Duration::from_secs(20), 504, String::new()),
            Step::Delayed(Duration::from_secs(20), 200, r#"{"ok":true}"#.to_string()),
        ]);

        let started = Instant::now();
        let value: Value = harness.client("DeviceService").get("/devices").await.unwrap();

        assert_eq!(value, json!({"ok": true}));
        assert!(started.elapsed() >= Duration::from_secs(41));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_transport_message() {
        let harness = Harness::new(vec![Step::Unavailable]);

        let err = harness.client("AlertService").get::<Value>("/alerts").await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Unable to connect to server. Please check if the backend is running."
        );
        let logged = harness.ctx.loggers().sink().by_level(crate::logging::LogLevel::Error);
        assert_eq!(logged[0].data.as_ref().unwrap()["url"], "http://backend/api/v1/alerts");
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_failures_surface_unchanged() {
        let harness = Harness::new(vec![Step::Fail("stream reset by peer".into())]);

        let err = harness.client("AlertService").get::<Value>("/alerts").await.unwrap_err();

        assert!(matches!(err, ClientError::Transport(_)));
        assert_eq!(err.to_string(), "stream reset by peer");
        let logged = harness.ctx.loggers().sink().by_level(crate::logging::LogLevel::Error);
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].error.as_ref().unwrap().name, "TransportError");
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_success_body_is_decode_error() {
        let harness = Harness::new(vec![respond(200, "{not json")]);

        let err = harness.client("AlertService").get::<Value>("/alerts").await.unwrap_err();

        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_policy_without_retries() {
        let harness = Harness::new(vec![respond(503, ""), respond(200, "{}")]);
        let ctx = harness.ctx.clone().with_policy(RequestPolicy {
            max_retries: 0,
            ..RequestPolicy::default()
        });

        let client = crate::http::HttpClient::new("http://backend", "AlertService", &ctx);
        let err = client.get::<Value>("/alerts").await.unwrap_err();

        assert_eq!(err.status(), Some(503));
        assert_eq!(harness.transport.requests().len(), 1);
    }

    #[test]
    fn test_policy_from_config() {
        let api = ApiConfig {
            timeout_ms: 5_000,
            retry_delay_ms: 250,
            ..ApiConfig::default()
        };
        let policy = RequestPolicy::from_config(&api);

        assert_eq!(policy.timeout, Duration::from_secs(5));
        assert_eq!(policy.retry_delay, Duration::from_millis(250));
        assert!(policy.should_retry(502, 0));
        assert!(!policy.should_retry(502, 1));
        assert!(!policy.should_retry(500, 0));
    }

    #[test]
    fn test_with_query_encodes_and_skips_unset() {
        assert_eq!(with_query("/alerts", &[("severity", None)]), "/alerts");
        assert_eq!(
            with_query(
                "/alerts",
                &[
                    ("severity", Some("critical".to_string())),
                    ("search", Some("core switch".to_string())),
                    ("page", None),
                ]
            ),
            "/alerts?severity=critical&search=core+switch"
        );
    }
}
