//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 覆盖：
//! - 配置文件 -> dispatcher -> 实际发出的 HTTP 请求
//! - 调试模式路由 (payload / request)
//! - 非 JSON 响应与错误响应

#[cfg(test)]
mod e2e_tests {
    use std::io::Write;

    use contracts::{ContentItem, DebugMode, RequestContext, FBC_COOKIE, FBP_COOKIE};
    use dispatcher::{
        hash_email, BufferInspector, DispatchOutcome, EventDispatcher, FixedClock,
        GraphApiTransport, ResponseBody,
    };
    use serde_json::{json, Value};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    const NOW: i64 = 1_700_000_000;

    /// 一次性服务器捕获的请求
    struct CapturedRequest {
        request_line: String,
        headers: Vec<(String, String)>,
        body: Vec<u8>,
    }

    impl CapturedRequest {
        fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        }

        fn json(&self) -> Value {
            serde_json::from_slice(&self.body).unwrap()
        }
    }

    /// 接受一个连接，捕获请求并返回预设响应
    async fn one_shot_server(
        status: u16,
        content_type: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<CapturedRequest>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];

            let header_end = loop {
                let n = socket.read(&mut buf).await.unwrap();
                assert!(n > 0, "connection closed before headers");
                raw.extend_from_slice(&buf[..n]);
                if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };

            let head = String::from_utf8(raw[..header_end].to_vec()).unwrap();
            let mut lines = head.split("\r\n").filter(|l| !l.is_empty());
            let request_line = lines.next().unwrap().to_string();
            let headers: Vec<(String, String)> = lines
                .filter_map(|l| l.split_once(':'))
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                .collect();

            let content_length = headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
                .map(|(_, v)| v.parse::<usize>().unwrap())
                .unwrap_or(0);

            while raw.len() < header_end + content_length {
                let n = socket.read(&mut buf).await.unwrap();
                assert!(n > 0, "connection closed before body");
                raw.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {status} Canned\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();

            CapturedRequest {
                request_line,
                headers,
                body: raw[header_end..header_end + content_length].to_vec(),
            }
        });

        (base_url, handle)
    }

    fn write_config(base_url: &str, debug: &str) -> tempfile::NamedTempFile {
        let content = format!(
            r#"
[moduleConf]
accessToken = "SECRET_TOKEN"
apiVersion = "v18.0"
pixelId = "PIXEL42"
debug = {debug}
testCode = "TEST123"
graphBaseUrl = "{base_url}"
"#
        );
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn dispatcher_for(
        file: &tempfile::NamedTempFile,
    ) -> EventDispatcher<GraphApiTransport, BufferInspector> {
        let config = config_loader::ConfigLoader::load_from_path(file.path()).unwrap();
        EventDispatcher::new(
            config,
            GraphApiTransport::new().unwrap(),
            BufferInspector::new("e2e"),
        )
        .with_clock(FixedClock(NOW))
    }

    fn ctx() -> RequestContext {
        RequestContext::new("shop.example", "/cart", "203.0.113.9", "E2EAgent/2.0")
            .with_tls(true)
            .with_cookie(FBP_COOKIE, "fb.1.1700000000.123")
            .with_cookie(FBC_COOKIE, "fb.1.1700000000.click")
    }

    #[tokio::test]
    async fn test_e2e_purchase_reaches_endpoint() {
        let (base_url, server) =
            one_shot_server(200, "application/json", r#"{"events_received":1}"#).await;
        let file = write_config(&base_url, "false");
        let d = dispatcher_for(&file);

        let outcome = d
            .try_send_event(
                &ctx(),
                Some("https://shop.example/checkout"),
                Some("a@b.com"),
                dispatcher::ConversionEvent::Purchase {
                    content_ids: vec!["SKU1".into(), "SKU2".into()],
                    order_value: 19.999,
                    currency: "EUR".into(),
                },
            )
            .await
            .unwrap();

        let request = server.await.unwrap();
        assert_eq!(
            request.request_line,
            "POST /v18.0/PIXEL42/events?access_token=SECRET_TOKEN HTTP/1.1"
        );
        assert_eq!(request.header("content-type"), Some("application/json"));

        let body = request.json();
        let event = &body["data"][0];
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert!(body.get("test_event_code").is_none());
        assert_eq!(event["event_name"], "Purchase");
        assert_eq!(event["event_time"], NOW);
        assert_eq!(event["action_source"], "website");
        assert_eq!(event["event_source_url"], "https://shop.example/checkout");
        assert_eq!(event["user_data"]["client_ip_address"], "203.0.113.9");
        assert_eq!(event["user_data"]["client_user_agent"], "E2EAgent/2.0");
        assert_eq!(event["user_data"]["fbp"], "fb.1.1700000000.123");
        assert_eq!(event["user_data"]["fbc"], "fb.1.1700000000.click");
        assert_eq!(event["user_data"]["em"], hash_email("a@b.com"));
        assert_eq!(
            event["custom_data"],
            json!({
                "currency": "EUR",
                "value": "20.00",
                "content_type": "product",
                "content_ids": ["SKU1", "SKU2"],
            })
        );

        assert_eq!(
            outcome,
            DispatchOutcome::Transmitted {
                status: 200,
                response: ResponseBody::Json(json!({"events_received": 1})),
            }
        );
        assert!(d.inspector().is_empty());
        assert_eq!(d.metrics().transmitted_count, 1);
    }

    #[tokio::test]
    async fn test_e2e_page_view_uses_current_url() {
        let (base_url, server) =
            one_shot_server(200, "application/json", r#"{"events_received":1}"#).await;
        let file = write_config(&base_url, "false");
        let d = dispatcher_for(&file);

        d.send_page_view_event(&ctx()).await;

        let body = server.await.unwrap().json();
        let event = &body["data"][0];
        assert_eq!(event["event_name"], "PageView");
        assert_eq!(event["event_source_url"], "https://shop.example/cart");
        assert!(event.get("custom_data").is_none());
        assert!(event["user_data"].get("em").is_none());
    }

    #[tokio::test]
    async fn test_e2e_request_mode_sends_test_code_and_renders_response() {
        let (base_url, server) =
            one_shot_server(200, "application/json", r#"{"events_received":1,"fbtrace_id":"X"}"#)
                .await;
        let file = write_config(&base_url, "\"request\"");
        let d = dispatcher_for(&file);
        assert_eq!(d.config().debug_mode, DebugMode::Request);

        d.send_add_to_cart_event(
            &ctx(),
            None,
            None,
            vec![ContentItem::new("A", 2)],
            5.5,
            "USD",
        )
        .await;

        let body = server.await.unwrap().json();
        assert_eq!(body["test_event_code"], "TEST123");
        assert_eq!(
            body["data"][0]["custom_data"]["contents"],
            json!([{"id": "A", "quantity": 2}])
        );
        assert_eq!(body["data"][0]["custom_data"]["value"], "5.50");

        let entries = d.inspector().take();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, "response");
        let rendered: Value = serde_json::from_str(&entries[0].1).unwrap();
        assert_eq!(rendered["fbtrace_id"], "X");
    }

    #[tokio::test]
    async fn test_e2e_request_mode_renders_text_response() {
        let (base_url, server) = one_shot_server(502, "text/plain", "bad gateway").await;
        let file = write_config(&base_url, "\"request\"");
        let d = dispatcher_for(&file);

        let outcome = d
            .try_send_event(
                &ctx(),
                None,
                None,
                dispatcher::ConversionEvent::CompleteRegistration {
                    status: "registered".into(),
                },
            )
            .await
            .unwrap();
        server.await.unwrap();

        assert_eq!(
            outcome,
            DispatchOutcome::Transmitted {
                status: 502,
                response: ResponseBody::Text("bad gateway".into()),
            }
        );
        assert_eq!(
            d.inspector().entries(),
            vec![("response".to_string(), "bad gateway".to_string())]
        );
        assert_eq!(d.metrics().rejected_count, 1);
    }

    #[tokio::test]
    async fn test_e2e_payload_mode_sends_nothing() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let file = write_config(&base_url, "\"payload\"");
        let d = dispatcher_for(&file);

        d.send_initiate_checkout_event(&ctx(), None, Some("x@y.org"), 42.0, "EUR")
            .await;

        let entries = d.inspector().take();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, "payload");
        let rendered: Value = serde_json::from_str(&entries[0].1).unwrap();
        assert_eq!(rendered["test_event_code"], "TEST123");
        assert_eq!(rendered["data"][0]["event_name"], "InitiateCheckout");
        assert_eq!(rendered["data"][0]["custom_data"]["value"], "42.00");

        let accepted = tokio::time::timeout(
            std::time::Duration::from_millis(100),
            listener.accept(),
        )
        .await;
        assert!(accepted.is_err(), "payload mode must not connect");
        assert_eq!(d.metrics().transmitted_count, 0);
        assert_eq!(d.metrics().inspected_count, 1);
    }

    #[tokio::test]
    async fn test_e2e_unreachable_endpoint_is_swallowed() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);
        let file = write_config(&base_url, "false");
        let d = dispatcher_for(&file);

        d.send_view_content_event(
            &ctx(),
            None,
            None,
            "Product 42",
            vec!["42".into()],
            9.995,
            "EUR",
        )
        .await;

        let snapshot = d.metrics();
        assert_eq!(snapshot.built_count, 1);
        assert_eq!(snapshot.failure_count, 1);
        assert!(d.inspector().is_empty());
    }

    #[test]
    fn test_debug_without_test_code_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(
            br#"{"moduleConf":{"accessToken":"t","apiVersion":"v18.0","pixelId":"1","debug":"payload"}}"#,
        )
        .unwrap();
        let err = config_loader::ConfigLoader::load_from_path(file.path()).unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("testCode"));
    }
}
