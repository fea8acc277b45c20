// tests/common/mod.rs
//
// Shared fixtures: content catalogs on disk, in-process fake model upstreams,
// and oneshot helpers for the router.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    body::{self, Body},
    http::{HeaderMap, Request, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceExt as _; // for `oneshot`

use oracolo::content::{Aphorism, APHORISMS_FILE, ARCHETYPES_FILE};
use oracolo::reading::ReadingContext;

pub const BODY_LIMIT: usize = 1024 * 1024;

pub const APHORISMS: &str = r#"[
    {"tema": "amore", "emozione": "nostalgia", "autore": "Rumi", "testo": "La ferita è il luogo da cui entra la luce."},
    {"tema": "lavoro", "emozione": "paura", "autore": "Seneca", "testo": "Chi teme ciò che verrà soffre due volte."},
    {"tema": "futuro", "emozione": "speranza", "autore": "Dickinson", "testo": "La speranza è quella cosa piumata."}
]"#;

pub const ARCHETYPES: &str = r#"[
    {"nome": "Il Viandante", "descrizione": "Chi cerca", "tema": "ricerca", "energia": "movimento"},
    {"nome": "La Custode", "descrizione": "Chi protegge", "tema": "cura", "energia": "quiete"},
    {"nome": "La Luna", "descrizione": "Chi intuisce", "tema": "intuizione", "energia": "ricettività"}
]"#;

pub const ARCHETYPE_NAMES: [&str; 3] = ["Il Viandante", "La Custode", "La Luna"];

pub fn write_content(dir: &Path) {
    write_catalogs(dir, APHORISMS, ARCHETYPES);
}

pub fn write_catalogs(dir: &Path, aphorisms: &str, archetypes: &str) {
    std::fs::write(dir.join(APHORISMS_FILE), aphorisms).expect("write aphorisms");
    std::fs::write(dir.join(ARCHETYPES_FILE), archetypes).expect("write archetypes");
}

pub fn context(question: &str) -> ReadingContext {
    ReadingContext::new(
        question,
        Aphorism {
            theme: "lavoro".into(),
            emotion: "paura".into(),
            author: "Seneca".into(),
            text: "Chi teme ciò che verrà soffre due volte.".into(),
        },
        ARCHETYPE_NAMES.iter().map(|s| s.to_string()).collect(),
    )
}

/// Reading JSON the way a model would emit it.
pub fn reading_json(archetype: &str) -> String {
    json!({
        "interpretazione": "Il timore è un'ombra che precede la luce.",
        "archetipo": archetype,
        "saluto": "Cammina in pace."
    })
    .to_string()
}

pub fn chat_completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": content }, "finish_reason": "stop" }
        ]
    })
}

pub fn ollama_generate(response: &str) -> Value {
    json!({ "model": "llama3.1", "response": response, "done": true })
}

/// In-process fake upstream answering every POST on `path` with a canned reply.
pub struct FakeUpstream {
    pub addr: SocketAddr,
    pub hits: Arc<AtomicUsize>,
    pub requests: Arc<Mutex<Vec<(HeaderMap, Value)>>>,
}

impl FakeUpstream {
    pub async fn start(path: &'static str, status: StatusCode, reply: Value) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));

        let (h, r) = (hits.clone(), requests.clone());
        let app = Router::new().route(
            path,
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let (h, r, reply) = (h.clone(), r.clone(), reply.clone());
                async move {
                    h.fetch_add(1, Ordering::SeqCst);
                    r.lock().unwrap().push((headers, body));
                    (status, Json(reply))
                }
            }),
        );

        let addr = serve(app).await;
        Self {
            addr,
            hits,
            requests,
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> (HeaderMap, Value) {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("upstream saw no request")
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

pub async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake upstream");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake upstream crashed");
    });
    addr
}

/// A loopback URL nothing listens on (connection refused).
pub fn dead_url(path: &str) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe");
    let addr = listener.local_addr().expect("probe addr");
    drop(listener);
    format!("http://{addr}{path}")
}

pub async fn post_oracle(app: Router, body: &str) -> (StatusCode, HeaderMap, Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/api/oracle")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("build POST /api/oracle");

    let resp = app.oneshot(req).await.expect("oneshot /api/oracle");
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    let v: Value = serde_json::from_slice(&bytes).expect("parse oracle json");
    (status, headers, v)
}
