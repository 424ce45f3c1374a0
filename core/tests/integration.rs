//! End-to-end tests against the live mock server.
//!
//! # Design
//! Each test starts its own mock server on a random port so tests stay
//! independent under the parallel test runner, then drives the builder over
//! real HTTP with the default `ureq` transport. `/echo` reports back exactly
//! what arrived, which lets the tests assert on the wire-level request.

use std::time::{Duration, Instant};

use apifast::{build, Auth, Error, Header};
use mock_server::{Item, RecordedRequest, REDIRECT_TARGET};

/// Start the mock server on a random port and return its base URL.
fn spawn_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

#[test]
fn get_decodes_body_into_result() {
    let base = spawn_server();

    let resp = build()
        .uri(format!("{base}/items/1"))
        .result::<Item>()
        .get()
        .unwrap();

    assert_eq!(resp.code, 200);
    assert_eq!(resp.msg, "HTTP/1.1 200 OK");
    assert_eq!(
        resp.result,
        Item {
            id: 1,
            name: "foo".to_string()
        }
    );
    assert_eq!(resp.body, br#"{"id":1,"name":"foo"}"#);
}

#[test]
fn post_payload_arrives_byte_for_byte() {
    let base = spawn_server();

    let resp = build()
        .uri(format!("{base}/echo"))
        .payload(br#"{"a":1}"#.to_vec())
        .result::<RecordedRequest>()
        .post()
        .unwrap();

    assert_eq!(resp.result.method, "POST");
    assert_eq!(resp.result.body, br#"{"a":1}"#);

    // The server-side journal agrees with the echo.
    let journal = build()
        .uri(format!("{base}/journal"))
        .result::<Vec<RecordedRequest>>()
        .get()
        .unwrap()
        .into_result();
    assert_eq!(journal, vec![resp.result]);
}

#[test]
fn get_with_payload_still_sends_body() {
    let base = spawn_server();

    let echoed = build()
        .uri(format!("{base}/echo"))
        .payload("query")
        .result::<RecordedRequest>()
        .get()
        .unwrap()
        .into_result();

    assert_eq!(echoed.method, "GET");
    assert_eq!(echoed.body, b"query");
}

#[test]
fn no_payload_means_no_body() {
    let base = spawn_server();

    let echoed = build()
        .uri(format!("{base}/echo"))
        .result::<RecordedRequest>()
        .delete()
        .unwrap()
        .into_result();

    assert_eq!(echoed.method, "DELETE");
    assert!(echoed.body.is_empty());
}

#[test]
fn headers_and_bearer_token_reach_the_server() {
    let base = spawn_server();

    let echoed = build()
        .uri(format!("{base}/echo"))
        .headers(vec![
            Header::new("X-Request-Id", 7u32),
            Header::new("X-Debug", true),
        ])
        .auth(Auth::bearer("t"))
        .result::<RecordedRequest>()
        .get()
        .unwrap()
        .into_result();

    assert_eq!(echoed.header("x-request-id"), Some("7"));
    assert_eq!(echoed.header("x-debug"), Some("true"));
    assert_eq!(echoed.header_count("authorization"), 1);
    assert_eq!(echoed.header("authorization"), Some("Bearer t"));
}

#[test]
fn basic_auth_wins_over_bearer_on_the_wire() {
    let base = spawn_server();

    let echoed = build()
        .uri(format!("{base}/echo"))
        .auth(Auth {
            username: "u".to_string(),
            password: "p".to_string(),
            token: "t".to_string(),
        })
        .result::<RecordedRequest>()
        .get()
        .unwrap()
        .into_result();

    assert_eq!(echoed.header_count("authorization"), 1);
    assert_eq!(echoed.header("authorization"), Some("Basic dTpw"));
}

#[test]
fn no_credentials_no_authorization_header() {
    let base = spawn_server();

    let echoed = build()
        .uri(format!("{base}/echo"))
        .result::<RecordedRequest>()
        .get()
        .unwrap()
        .into_result();

    assert_eq!(echoed.header_count("authorization"), 0);
}

#[test]
fn unresponsive_server_times_out() {
    let base = spawn_server();

    let started = Instant::now();
    let err = build()
        .uri(format!("{base}/hang"))
        .timeout(Duration::from_millis(50))
        .get()
        .unwrap_err();
    let elapsed = started.elapsed();

    assert!(matches!(err, Error::Timeout), "expected Timeout, got {err:?}");
    assert!(elapsed >= Duration::from_millis(50), "returned early: {elapsed:?}");
    assert!(elapsed < Duration::from_millis(300), "took too long: {elapsed:?}");
}

#[test]
fn invalid_json_with_result_is_a_decode_error() {
    let base = spawn_server();

    let err = build()
        .uri(format!("{base}/malformed"))
        .result::<Item>()
        .get()
        .unwrap_err();

    assert!(matches!(err, Error::Decode(_)), "expected Decode, got {err:?}");
}

#[test]
fn invalid_json_without_result_is_returned_raw() {
    let base = spawn_server();

    let resp = build().uri(format!("{base}/malformed")).get().unwrap();

    assert_eq!(resp.code, 200);
    assert_eq!(resp.text(), "this is not json");
}

#[test]
fn error_statuses_are_responses() {
    let base = spawn_server();

    let resp = build().uri(format!("{base}/status/503")).patch().unwrap();

    assert_eq!(resp.code, 503);
    assert_eq!(resp.msg, "HTTP/1.1 503 Service Unavailable");
    assert!(!resp.is_success());
    let body: serde_json::Value = resp.json().unwrap();
    assert_eq!(body["code"], 503);
}

#[test]
fn refused_connection_is_a_transport_error() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let err = build()
        .uri(format!("http://{addr}/"))
        .timeout(Duration::from_secs(2))
        .get()
        .unwrap_err();

    assert!(matches!(err, Error::Transport(_)), "expected Transport, got {err:?}");
}

#[test]
fn item_lifecycle_uses_every_verb() {
    let base = spawn_server();

    // Step 1: create.
    let created = build()
        .uri(format!("{base}/items"))
        .json(&serde_json::json!({"name": "bar"}))
        .unwrap()
        .result::<Item>()
        .post()
        .unwrap();
    assert_eq!(created.code, 201);
    let id = created.result.id;
    assert_eq!(created.result.name, "bar");

    // Step 2: rename.
    let updated = build()
        .uri(format!("{base}/items/{id}"))
        .json(&serde_json::json!({"name": "baz"}))
        .unwrap()
        .result::<Item>()
        .patch()
        .unwrap();
    assert_eq!(updated.result.name, "baz");

    // Step 3: delete.
    let deleted = build().uri(format!("{base}/items/{id}")).delete().unwrap();
    assert_eq!(deleted.code, 204);
    assert!(deleted.body.is_empty());

    // Step 4: get after delete is a 404 response, not an error.
    let missing = build().uri(format!("{base}/items/{id}")).get().unwrap();
    assert_eq!(missing.code, 404);
}

#[test]
fn independent_builders_run_concurrently() {
    let base = spawn_server();

    let handles: Vec<_> = (0..8usize)
        .map(|i| {
            let base = base.clone();
            std::thread::spawn(move || {
                build()
                    .uri(format!("{base}/echo"))
                    .header("X-Worker", i)
                    .payload(format!("worker-{i}"))
                    .result::<RecordedRequest>()
                    .post()
                    .map(|resp| resp.into_result())
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let echoed = handle.join().unwrap().unwrap();
        assert_eq!(echoed.header("x-worker"), Some(i.to_string().as_str()));
        assert_eq!(echoed.body, format!("worker-{i}").into_bytes());
    }
}

#[test]
fn bodies_over_ten_mebibytes_are_read_in_full() {
    let base = spawn_server();
    let size = 11 * 1024 * 1024;

    let resp = build()
        .uri(format!("{base}/large/{size}"))
        .timeout(Duration::from_secs(10))
        .get()
        .unwrap();

    assert_eq!(resp.code, 200);
    assert_eq!(resp.body.len(), size);
}

#[test]
fn redirects_are_returned_not_followed() {
    let base = spawn_server();

    let resp = build()
        .uri(format!("{base}/redirect"))
        .auth(Auth::bearer("t"))
        .get()
        .unwrap();

    assert_eq!(resp.code, 302);
    assert_eq!(resp.header("location"), Some(REDIRECT_TARGET));
}
