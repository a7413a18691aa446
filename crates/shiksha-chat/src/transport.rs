// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use serde::Deserialize;
use shiksha_model::Language;

/// One assistant response as the backend serves it. `mode` tells how the
/// answer was produced ("rag_only" or "hybrid" when an LLM contributed).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    pub answer: String,
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub sources: Vec<String>,
}

/// Seam over the chat backend so sessions can be exercised without a
/// network in tests.
pub trait ChatTransport {
    fn send(&mut self, query: &str, language: Language) -> Result<ChatReply>;
}

/// The analytics client doubles as the chat transport; both endpoints
/// live on the same backend and share its error reporting.
impl ChatTransport for shiksha_api::Client {
    fn send(&mut self, query: &str, language: Language) -> Result<ChatReply> {
        self.post_json(
            "/api/chat",
            &serde_json::json!({
                "query": query,
                "language": language.as_str(),
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::ChatTransport;
    use shiksha_api::Client;
    use shiksha_model::Language;
    use std::io::Read;
    use std::time::Duration;

    #[test]
    fn request_carries_query_and_language() {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("bind test server");
        let addr = format!("http://{}", server.server_addr());
        let handle = std::thread::spawn(move || {
            let mut request = server.recv().expect("one request");
            assert_eq!(request.url(), "/api/chat");
            let mut body = String::new();
            request
                .as_reader()
                .read_to_string(&mut body)
                .expect("read body");
            let parsed: serde_json::Value = serde_json::from_str(&body).expect("json body");
            assert_eq!(parsed["query"], "APAAR progress?");
            assert_eq!(parsed["language"], "hi");

            let reply = r#"{"answer":"**235M** registrations","mode":"rag_only","sources":["monthly_data"]}"#;
            let _ = request.respond(tiny_http::Response::from_string(reply));
        });

        let mut client = Client::new(&addr, Duration::from_secs(5)).expect("client");
        let reply = client
            .send("APAAR progress?", Language::Hindi)
            .expect("send should succeed");
        assert_eq!(reply.answer, "**235M** registrations");
        assert_eq!(reply.mode, "rag_only");
        assert_eq!(reply.sources, vec!["monthly_data"]);

        handle.join().expect("server thread");
    }

    #[test]
    fn backend_failure_is_an_error() {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("bind test server");
        let addr = format!("http://{}", server.server_addr());
        let handle = std::thread::spawn(move || {
            let request = server.recv().expect("one request");
            let _ = request.respond(tiny_http::Response::from_string("overloaded").with_status_code(503));
        });

        let mut client = Client::new(&addr, Duration::from_secs(5)).expect("client");
        let error = client
            .send("anything", Language::English)
            .expect_err("503 should fail");
        assert!(error.to_string().contains("503"));

        handle.join().expect("server thread");
    }
}
