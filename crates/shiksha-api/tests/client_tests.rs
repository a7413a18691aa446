// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use shiksha_api::Client;
use std::time::Duration;

fn spawn_server(
    handler: impl Fn(tiny_http::Request) + Send + 'static,
) -> (String, std::thread::JoinHandle<()>) {
    let server = tiny_http::Server::http("127.0.0.1:0").expect("bind test server");
    let addr = format!("http://{}", server.server_addr());
    let handle = std::thread::spawn(move || {
        if let Ok(request) = server.recv() {
            handler(request);
        }
    });
    (addr, handle)
}

fn json_response(body: &str) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let header = tiny_http::Header::from_bytes("Content-Type", "application/json")
        .expect("valid content type header");
    tiny_http::Response::from_string(body).with_header(header)
}

#[test]
fn full_data_decodes_wire_payload() {
    let payload = serde_json::to_string(&shiksha_testkit::sample_snapshot()).expect("serialize");
    let (addr, handle) = spawn_server(move |request| {
        assert_eq!(request.url(), "/api/analytics/full-data");
        let _ = request.respond(json_response(&payload));
    });

    let client = Client::new(&addr, Duration::from_secs(5)).expect("client");
    let snapshot = client.full_data().expect("fetch should succeed");
    assert_eq!(snapshot.months.len(), 10);
    assert_eq!(snapshot.director_message.name, "Dr. Kavita Raghavan");

    handle.join().expect("server thread");
}

#[test]
fn overview_decodes_trends() {
    let (addr, handle) = spawn_server(|request| {
        assert_eq!(request.url(), "/api/analytics/overview");
        let body = r#"{
            "attendance_trend": [
                {"month": "December 2025", "attendance": 96.6},
                {"month": "January 2026", "attendance": 96.8}
            ],
            "apaar_trend": [
                {"month": "December 2025", "apaar_ids": 227000000},
                {"month": "January 2026", "apaar_ids": 235000000}
            ],
            "states": ["Kerala", "Gujarat"]
        }"#;
        let _ = request.respond(json_response(body));
    });

    let client = Client::new(&addr, Duration::from_secs(5)).expect("client");
    let overview = client.overview().expect("fetch should succeed");
    assert_eq!(overview.attendance_trend.len(), 2);
    assert_eq!(overview.attendance_trend[1].attendance, 96.8);
    assert_eq!(overview.apaar_trend[1].apaar_ids, 235_000_000);
    assert_eq!(overview.states, vec!["Kerala", "Gujarat"]);

    handle.join().expect("server thread");
}

#[test]
fn server_error_detail_surfaces_in_the_message() {
    let (addr, handle) = spawn_server(|request| {
        let response = tiny_http::Response::from_string(r#"{"detail":"database offline"}"#)
            .with_status_code(503);
        let _ = request.respond(response);
    });

    let client = Client::new(&addr, Duration::from_secs(5)).expect("client");
    let error = client.full_data().expect_err("503 should fail");
    let message = error.to_string();
    assert!(message.contains("503"), "got: {message}");
    assert!(message.contains("database offline"), "got: {message}");

    handle.join().expect("server thread");
}

#[test]
fn unreachable_backend_mentions_the_base_url() {
    let client = Client::new("http://127.0.0.1:1", Duration::from_millis(500)).expect("client");
    let error = client.full_data().expect_err("nothing listens on port 1");
    assert!(error.to_string().contains("http://127.0.0.1:1"));
}
