use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use composite_core::{parse_request_str, ApiRequest, CompositeRequest, RequestFormat};
use composite_exec::executor::{
    Event, EventSink, HttpClient, HttpError, HttpRequestParts, HttpResponseParts, Orchestrator,
};
use composite_exec::ExecutorConfig;
use serde_json::{json, Value as JsonValue};

type Responder = dyn Fn(&HttpRequestParts) -> Result<HttpResponseParts, HttpError> + Send + Sync;

// Scripted HTTP client that records every request it receives.
struct MockHttpClient {
    respond: Box<Responder>,
    requests: Mutex<Vec<HttpRequestParts>>,
}

impl MockHttpClient {
    fn new(
        respond: impl Fn(&HttpRequestParts) -> Result<HttpResponseParts, HttpError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            respond: Box::new(respond),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<HttpRequestParts> {
        self.requests.lock().unwrap().clone()
    }

    fn urls(&self) -> Vec<String> {
        self.requests().iter().map(|r| r.url.to_string()).collect()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn send(
        &self,
        req: HttpRequestParts,
        _timeout: Duration,
        _max_response_bytes: usize,
    ) -> Result<HttpResponseParts, HttpError> {
        self.requests.lock().unwrap().push(req.clone());
        (self.respond)(&req)
    }
}

#[derive(Default)]
struct RecordingEventSink {
    events: Mutex<Vec<Event>>,
}

#[async_trait]
impl EventSink for RecordingEventSink {
    async fn emit(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

fn ok(body: JsonValue) -> Result<HttpResponseParts, HttpError> {
    status(200, body)
}

fn status(code: u16, body: JsonValue) -> Result<HttpResponseParts, HttpError> {
    Ok(HttpResponseParts {
        status: code,
        headers: BTreeMap::new(),
        body: body.to_string().into_bytes(),
    })
}

fn parse(json: &str) -> CompositeRequest {
    parse_request_str(json, RequestFormat::Json).unwrap().request
}

fn content_json(content: &str) -> JsonValue {
    serde_json::from_str(content).unwrap()
}

#[tokio::test]
async fn empty_step_list_is_rejected() {
    let http = MockHttpClient::new(|_| ok(json!({})));
    let orch = Orchestrator::with_http(http.clone());

    let resp = orch.run(&parse(r#"{ "requests": [] }"#), None).await;
    assert_eq!(resp.status, 400);

    let resp = orch.run(&parse(r#"{}"#), None).await;
    assert_eq!(resp.status, 400);
    assert!(http.requests().is_empty());
}

#[tokio::test]
async fn single_call_without_returns_renders_empty_object() {
    let http = MockHttpClient::new(|_| ok(json!([{"id": 1}, {"id": 2}])));
    let orch = Orchestrator::with_http(http.clone());

    let req = parse(r#"{"requests":[{"method":"get","endpoint":"https://svc/items"}]}"#);
    let resp = orch.run(&req, None).await;

    assert_eq!(resp.status, 200);
    assert_eq!(resp.content, "{}");
    let sent = http.requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, "GET");
    assert!(sent[0].body.is_empty());
}

#[tokio::test]
async fn single_match_binds_scalar_and_dump_parses_it() {
    let http = MockHttpClient::new(|_| ok(json!([{"id": 7}, {"id": 8}])));
    let orch = Orchestrator::with_http(http);

    let req = parse(
        r#"{"requests":[{"method":"get","endpoint":"https://svc/items","returns":{"firstId":"[0].id"}}]}"#,
    );
    let resp = orch.run(&req, None).await;

    assert_eq!(resp.status, 200);
    assert_eq!(content_json(&resp.content), json!({"firstId": 7}));
}

#[tokio::test]
async fn returned_value_threads_into_next_url() {
    let http = MockHttpClient::new(|req| match req.method.as_str() {
        "POST" => ok(json!({"id": 42})),
        _ => ok(json!({"id": 42, "name": "widget"})),
    });
    let orch = Orchestrator::with_http(http.clone());

    let req = parse(
        r#"{"requests":[
            {"method":"post","endpoint":"https://svc/items","parameters":{"name":"widget"},"returns":{"newId":"id"}},
            {"method":"get","endpoint":"https://svc/items/{newId}"}
        ]}"#,
    );
    let resp = orch.run(&req, None).await;

    assert_eq!(resp.status, 200);
    assert_eq!(http.urls()[1], "https://svc/items/42");
    assert_eq!(content_json(&resp.content), json!({"newId": 42}));
}

#[tokio::test]
async fn many_matches_bind_a_list_in_document_order() {
    let http = MockHttpClient::new(|_| ok(json!([{"id": 1}, {"id": 2}, {"id": 3}])));
    let orch = Orchestrator::with_http(http);

    let req = parse(
        r#"{"requests":[{"method":"get","endpoint":"https://svc/items","returns":{"ids":"[*].id"}}],
            "response":"ids={ids}"}"#,
    );
    let resp = orch.run(&req, None).await;

    assert_eq!(resp.status, 200);
    assert_eq!(resp.content, r#"ids=["1", "2", "3"]"#);
}

#[tokio::test]
async fn debug_trace_reports_list_match_count() {
    let http = MockHttpClient::new(|_| ok(json!([{"id": 1}, {"id": 2}, {"id": 3}])));
    let orch = Orchestrator::with_http(http);

    let req = parse(
        r#"{"debug":true,"requests":[{"method":"get","endpoint":"https://svc/items","returns":{"ids":"[*].id"}}]}"#,
    );
    let resp = orch.run(&req, None).await;

    assert_eq!(resp.status, 200);
    assert!(resp.content.contains(r#"[0] ids = ["1", "2", "3"] (3 matches)"#));
}

#[tokio::test]
async fn foreach_issues_one_call_per_element_and_restores_variable() {
    let http = MockHttpClient::new(|req| {
        if req.url.path() == "/items" {
            ok(json!([{"id": 1}, {"id": 2}, {"id": 3}]))
        } else {
            ok(json!({}))
        }
    });
    let orch = Orchestrator::with_http(http.clone());

    let req = parse(
        r#"{"requests":[
            {"method":"get","endpoint":"https://svc/items","returns":{"ids":"[*].id"}},
            {"method":"delete","endpoint":"https://svc/items/{ids}","foreach":"ids"}
        ],"response":{"deleted":"{ids}"}}"#,
    );
    let resp = orch.run(&req, None).await;

    assert_eq!(resp.status, 200);
    assert_eq!(
        http.urls(),
        vec![
            "https://svc/items",
            "https://svc/items/1",
            "https://svc/items/2",
            "https://svc/items/3",
        ]
    );
    assert_eq!(content_json(&resp.content), json!({"deleted": ["1", "2", "3"]}));
}

#[tokio::test]
async fn failing_iteration_stops_the_loop_and_restores_variable() {
    let http = MockHttpClient::new(|req| match req.url.path() {
        "/items" => ok(json!([{"id": 1}, {"id": 2}, {"id": 3}])),
        "/items/2" => status(503, json!({"error": "busy"})),
        _ => ok(json!({})),
    });
    let orch = Orchestrator::with_http(http.clone());

    let req = parse(
        r#"{"requests":[
            {"method":"get","endpoint":"https://svc/items","returns":{"ids":"[*].id"}},
            {"method":"delete","endpoint":"https://svc/items/{ids}","foreach":"ids"},
            {"method":"get","endpoint":"https://svc/after"}
        ]}"#,
    );
    let resp = orch.run(&req, None).await;

    assert_eq!(resp.status, 500);
    assert_eq!(
        http.urls(),
        vec![
            "https://svc/items",
            "https://svc/items/1",
            "https://svc/items/2",
        ]
    );
    assert_eq!(content_json(&resp.content), json!({"ids": ["1", "2", "3"]}));
}

#[tokio::test]
async fn foreach_over_empty_list_makes_no_calls() {
    let http = MockHttpClient::new(|req| match req.url.path() {
        "/items" => ok(json!({"ids": []})),
        _ => ok(json!({})),
    });
    let orch = Orchestrator::with_http(http.clone());

    let req = parse(
        r#"{"requests":[
            {"method":"get","endpoint":"https://svc/items","returns":{"ids":"ids"}},
            {"method":"delete","endpoint":"https://svc/items/{ids}","foreach":"ids"}
        ]}"#,
    );
    let resp = orch.run(&req, None).await;

    assert_eq!(resp.status, 200);
    assert_eq!(http.urls(), vec!["https://svc/items"]);
    assert_eq!(content_json(&resp.content), json!({"ids": []}));
}

#[tokio::test]
async fn oversized_numeric_strings_survive_the_dump() {
    let http = MockHttpClient::new(|_| {
        ok(json!({"id": "123456789012345678901234567890", "order": "18446744073709551616"}))
    });
    let orch = Orchestrator::with_http(http);

    let req = parse(
        r#"{"requests":[{"method":"get","endpoint":"https://svc/orders/1","returns":{"id":"id","order":"order"}}]}"#,
    );
    let resp = orch.run(&req, None).await;

    assert_eq!(resp.status, 200);
    assert!(resp.content.contains("123456789012345678901234567890"));
    assert!(resp.content.contains("18446744073709551616"));
    assert!(!resp.content.contains("e+"));
}

#[tokio::test]
async fn returns_key_outside_token_alphabet_is_rejected() {
    let http = MockHttpClient::new(|_| ok(json!({"id": 7})));
    let orch = Orchestrator::with_http(http.clone());

    let req = parse(
        r#"{"requests":[{"method":"get","endpoint":"https://svc/items","returns":{"first id":"id"}}],
            "response":{"value":"{first id}"}}"#,
    );
    let resp = orch.run(&req, None).await;

    assert_eq!(resp.status, 400);
    assert!(http.requests().is_empty());
    assert!(resp.content.contains("{first id}"));
}

#[tokio::test]
async fn foreach_over_unbound_variable_runs_once() {
    let http = MockHttpClient::new(|_| ok(json!({})));
    let orch = Orchestrator::with_http(http.clone());

    let req = CompositeRequest {
        requests: Some(vec![ApiRequest::new("get", "https://svc/ping").with_foreach("ids")]),
        ..Default::default()
    };
    let resp = orch.run(&req, None).await;

    assert_eq!(resp.status, 200);
    assert_eq!(http.requests().len(), 1);
}

#[tokio::test]
async fn foreach_appends_single_matches_across_iterations() {
    let http = MockHttpClient::new(|req| match req.url.path() {
        "/items" => ok(json!([{"id": "a"}, {"id": "b"}])),
        path => {
            let id = path.trim_start_matches("/items/");
            ok(json!({"name": format!("item-{id}")}))
        }
    });
    let orch = Orchestrator::with_http(http.clone());

    let req = parse(
        r#"{"requests":[
            {"method":"get","endpoint":"https://svc/items","returns":{"ids":"[*].id"}},
            {"method":"get","endpoint":"https://svc/items/{ids}","foreach":"ids","returns":{"names":"name"}}
        ]}"#,
    );
    let resp = orch.run(&req, None).await;

    assert_eq!(resp.status, 200);
    assert_eq!(
        content_json(&resp.content),
        json!({"ids": ["a", "b"], "names": ["item-a", "item-b"]})
    );
}

#[tokio::test]
async fn first_failure_aborts_remaining_steps() {
    let http = MockHttpClient::new(|req| match req.url.path() {
        "/a" => ok(json!({"v": "from-a"})),
        "/b" => status(500, json!({"error": "boom"})),
        _ => ok(json!({})),
    });
    let orch = Orchestrator::with_http(http.clone());

    let req = parse(
        r#"{"requests":[
            {"method":"get","endpoint":"https://svc/a","returns":{"v":"v"}},
            {"method":"get","endpoint":"https://svc/b"},
            {"method":"get","endpoint":"https://svc/c"}
        ],"debug":true}"#,
    );
    let resp = orch.run(&req, None).await;

    assert_eq!(resp.status, 500);
    assert_eq!(http.urls(), vec!["https://svc/a", "https://svc/b"]);
    assert!(resp.content.contains("ERROR: request 1"));
    // Partial bindings still render after the trace.
    assert!(resp.content.ends_with("{\n  \"v\": \"from-a\"\n}"));
}

#[tokio::test]
async fn non_2xx_downstream_status_surfaces_as_500() {
    let http = MockHttpClient::new(|_| status(404, json!({})));
    let orch = Orchestrator::with_http(http);

    let req = parse(r#"{"requests":[{"method":"get","endpoint":"https://svc/missing"}]}"#);
    assert_eq!(orch.run(&req, None).await.status, 500);
}

#[tokio::test]
async fn missing_endpoint_stops_with_400_after_earlier_steps() {
    let http = MockHttpClient::new(|_| ok(json!({"id": 5})));
    let orch = Orchestrator::with_http(http.clone());

    let req = parse(
        r#"{"requests":[
            {"method":"get","endpoint":"https://svc/a","returns":{"id":"id"}},
            {"method":"get"}
        ]}"#,
    );
    let resp = orch.run(&req, None).await;

    assert_eq!(resp.status, 400);
    assert_eq!(http.requests().len(), 1);
    assert_eq!(content_json(&resp.content), json!({"id": 5}));
}

#[tokio::test]
async fn invalid_jsonpath_is_an_extraction_error() {
    let http = MockHttpClient::new(|_| ok(json!({"a": 1})));
    let orch = Orchestrator::with_http(http);

    let req = parse(
        r#"{"requests":[{"method":"get","endpoint":"https://svc/a","returns":{"x":"$[?("}}],"debug":true}"#,
    );
    let resp = orch.run(&req, None).await;

    assert_eq!(resp.status, 400);
    assert!(resp.content.contains("cannot extract 'x'"));
}

#[tokio::test]
async fn zero_matches_skip_without_error() {
    let http = MockHttpClient::new(|_| ok(json!({"a": 1})));
    let orch = Orchestrator::with_http(http);

    let req = parse(
        r#"{"requests":[{"method":"get","endpoint":"https://svc/a","returns":{"x":"missing","a":"a"}}]}"#,
    );
    let resp = orch.run(&req, None).await;

    assert_eq!(resp.status, 200);
    assert_eq!(content_json(&resp.content), json!({"a": 1}));
}

#[tokio::test]
async fn transport_error_is_fatal_500() {
    let http = MockHttpClient::new(|_| Err(HttpError::Timeout));
    let orch = Orchestrator::with_http(http);

    let req = parse(r#"{"requests":[{"method":"get","endpoint":"https://svc/slow"}],"debug":true}"#);
    let resp = orch.run(&req, None).await;

    assert_eq!(resp.status, 500);
    assert!(resp.content.contains("FATAL: request 0"));
    assert!(resp.content.contains("timeout"));
}

#[tokio::test]
async fn non_json_body_with_returns_is_fatal() {
    let http = MockHttpClient::new(|_| {
        Ok(HttpResponseParts {
            status: 200,
            headers: BTreeMap::new(),
            body: b"<html>".to_vec(),
        })
    });
    let orch = Orchestrator::with_http(http);

    let req = parse(r#"{"requests":[{"method":"get","endpoint":"https://svc/a","returns":{"x":"x"}}]}"#);
    assert_eq!(orch.run(&req, None).await.status, 500);
}

#[tokio::test]
async fn invalid_rendered_url_is_fatal() {
    let http = MockHttpClient::new(|_| ok(json!({})));
    let orch = Orchestrator::with_http(http.clone());

    let req = parse(r#"{"requests":[{"method":"get","endpoint":"{base}/items"}]}"#);
    let resp = orch.run(&req, None).await;

    assert_eq!(resp.status, 500);
    assert!(http.requests().is_empty());
}

#[tokio::test]
async fn authorization_is_forwarded_verbatim() {
    let http = MockHttpClient::new(|_| ok(json!({})));
    let orch = Orchestrator::with_http(http.clone());

    let req = parse(
        r#"{"requests":[
            {"method":"get","endpoint":"https://svc/a"},
            {"method":"get","endpoint":"https://svc/b"}
        ],"debug":true}"#,
    );
    let resp = orch.run(&req, Some("Bearer abc.def")).await;

    for sent in http.requests() {
        assert_eq!(sent.header("authorization"), Some("Bearer abc.def"));
    }
    assert!(!resp.content.contains("abc.def"));
}

#[tokio::test]
async fn absent_authorization_sends_no_header() {
    let http = MockHttpClient::new(|_| ok(json!({})));
    let orch = Orchestrator::with_http(http.clone());

    let req = parse(r#"{"requests":[{"method":"get","endpoint":"https://svc/a"}]}"#);
    orch.run(&req, None).await;

    assert_eq!(http.requests()[0].header("Authorization"), None);
}

#[tokio::test]
async fn parameters_render_into_body_and_url() {
    let http = MockHttpClient::new(|req| match req.method.as_str() {
        "GET" => ok(json!({"owner": "alice"})),
        _ => ok(json!({})),
    });
    let orch = Orchestrator::with_http(http.clone());

    let req = parse(
        r#"{"requests":[
            {"method":"get","endpoint":"https://svc/me","returns":{"owner":"owner"}},
            {"method":"put","endpoint":"https://svc/owners/{owner}/items/{slot}",
             "parameters":{"slot":"7","label":"owned by {owner}","count":3}}
        ]}"#,
    );
    let resp = orch.run(&req, None).await;

    assert_eq!(resp.status, 200);
    let sent = http.requests();
    assert_eq!(sent[1].url.as_str(), "https://svc/owners/alice/items/7");
    assert_eq!(sent[1].header("content-type"), Some("application/json"));
    let body: JsonValue = serde_json::from_slice(&sent[1].body).unwrap();
    assert_eq!(body, json!({"slot": "7", "label": "owned by alice", "count": 3}));
}

#[tokio::test]
async fn returns_expression_is_templated() {
    let http = MockHttpClient::new(|req| match req.url.path() {
        "/config" => ok(json!({"field": "price"})),
        _ => ok(json!({"price": 12, "cost": 3})),
    });
    let orch = Orchestrator::with_http(http);

    let req = parse(
        r#"{"requests":[
            {"method":"get","endpoint":"https://svc/config","returns":{"field":"field"}},
            {"method":"get","endpoint":"https://svc/item","returns":{"value":"{field}"}}
        ]}"#,
    );
    let resp = orch.run(&req, None).await;

    assert_eq!(content_json(&resp.content), json!({"field": "price", "value": 12}));
}

#[tokio::test]
async fn concurrent_runs_do_not_share_state() {
    let http = MockHttpClient::new(|req| {
        let id = req.url.path().trim_start_matches('/').to_string();
        ok(json!({"id": id}))
    });
    let orch = Orchestrator::with_http(http);

    let a = parse(r#"{"requests":[{"method":"get","endpoint":"https://svc/a","returns":{"a":"id"}}]}"#);
    let b = parse(r#"{"requests":[{"method":"get","endpoint":"https://svc/b","returns":{"b":"id"}}]}"#);
    let (ra, rb) = tokio::join!(orch.run(&a, Some("Basic one")), orch.run(&b, None));

    assert_eq!(content_json(&ra.content), json!({"a": "a"}));
    assert_eq!(content_json(&rb.content), json!({"b": "b"}));
}

#[tokio::test]
async fn events_follow_the_run() {
    let http = MockHttpClient::new(|_| ok(json!({"id": 1})));
    let sink = Arc::new(RecordingEventSink::default());
    let orch = Orchestrator::new(ExecutorConfig::default(), http, sink.clone());

    let req = parse(r#"{"requests":[{"method":"get","endpoint":"https://svc/a","returns":{"id":"id"}}]}"#);
    orch.run(&req, None).await;

    let kinds: Vec<_> = sink.events.lock().unwrap().iter().map(|e| e.kind()).collect();
    assert_eq!(
        kinds,
        vec!["run.started", "call.started", "call.finished", "variable.bound", "run.finished"]
    );
}
