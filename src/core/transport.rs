//! REST transport
//!
//! The core only needs five operations against the backend. [`Transport`]
//! expresses them over JSON values; [`EntityTransport`] layers typed access on
//! top. [`HttpTransport`] talks to the real backend with a blocking `reqwest`
//! client; ids and filters are percent-encoded before they reach the URL.

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::core::entity::Entity;
use crate::core::identity::{EntityKind, EntityRef};

/// Errors that can occur while talking to the backend
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{method} {url} returned HTTP {status}{}", detail_suffix(.detail))]
    Status {
        method: String,
        url: String,
        status: u16,
        detail: Option<String>,
    },

    #[error("unexpected response: {message}")]
    UnexpectedBody { message: String },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(d) if !d.is_empty() => format!(": {}", d),
        _ => String::new(),
    }
}

impl TransportError {
    /// HTTP status, if the backend answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Request/response contract of the REST backend
pub trait Transport {
    /// `GET /api/{resource}[?filter=...]`
    fn query(&self, kind: EntityKind, filter: Option<&str>) -> Result<Vec<Value>, TransportError>;

    /// `GET /api/{resource}/{id}`; `Ok(None)` when the response body is empty
    fn fetch(&self, kind: EntityKind, id: &str) -> Result<Option<Value>, TransportError>;

    /// `POST /api/{resource}`
    fn create(&self, kind: EntityKind, draft: &Value) -> Result<Value, TransportError>;

    /// `PUT /api/{resource}/{id}`
    fn update(&self, kind: EntityKind, id: i64, entity: &Value) -> Result<Value, TransportError>;

    /// `DELETE /api/{resource}/{id}`
    fn delete(&self, kind: EntityKind, id: i64) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn query(&self, kind: EntityKind, filter: Option<&str>) -> Result<Vec<Value>, TransportError> {
        (**self).query(kind, filter)
    }

    fn fetch(&self, kind: EntityKind, id: &str) -> Result<Option<Value>, TransportError> {
        (**self).fetch(kind, id)
    }

    fn create(&self, kind: EntityKind, draft: &Value) -> Result<Value, TransportError> {
        (**self).create(kind, draft)
    }

    fn update(&self, kind: EntityKind, id: i64, entity: &Value) -> Result<Value, TransportError> {
        (**self).update(kind, id, entity)
    }

    fn delete(&self, kind: EntityKind, id: i64) -> Result<(), TransportError> {
        (**self).delete(kind, id)
    }
}

/// Typed access on top of any [`Transport`]
pub trait EntityTransport: Transport {
    fn query_entities<E: Entity>(&self, filter: Option<&str>) -> Result<Vec<E>, TransportError> {
        decode_all(self.query(E::KIND, filter)?)
    }

    /// Candidates for a reference selector, as identity projections
    fn query_refs(
        &self,
        kind: EntityKind,
        filter: Option<&str>,
    ) -> Result<Vec<EntityRef>, TransportError> {
        decode_all(self.query(kind, filter)?)
    }

    fn fetch_entity<E: Entity>(&self, id: &str) -> Result<Option<E>, TransportError> {
        match self.fetch(E::KIND, id)? {
            Some(body) => Ok(Some(serde_json::from_value(body)?)),
            None => Ok(None),
        }
    }

    fn create_entity<E: Entity>(&self, draft: &E) -> Result<E, TransportError> {
        let body = self.create(E::KIND, &serde_json::to_value(draft)?)?;
        Ok(serde_json::from_value(body)?)
    }

    fn update_entity<E: Entity>(&self, id: i64, entity: &E) -> Result<E, TransportError> {
        let body = self.update(E::KIND, id, &serde_json::to_value(entity)?)?;
        Ok(serde_json::from_value(body)?)
    }
}

impl<T: Transport + ?Sized> EntityTransport for T {}

fn decode_all<T: DeserializeOwned>(values: Vec<Value>) -> Result<Vec<T>, TransportError> {
    values
        .into_iter()
        .map(|v| serde_json::from_value(v).map_err(TransportError::from))
        .collect()
}

/// HTTP transport for the REST backend
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    token: Option<String>,
    timeout: Duration,
    /// If true, print each request to stderr before sending it
    verbose: bool,
}

impl HttpTransport {
    /// Create a transport for the backend rooted at `base_url`
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            timeout: Duration::from_secs(30),
            verbose: false,
        }
    }

    /// Send `Authorization: Bearer <token>` with every request
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// URL of a collection or of one record in it
    pub fn url(&self, kind: EntityKind, id: Option<&str>, filter: Option<&str>) -> String {
        let mut url = format!("{}/api/{}", self.base_url, kind.resource());
        if let Some(id) = id {
            url.push('/');
            url.push_str(&urlencoding::encode(id));
        }
        if let Some(filter) = filter {
            url.push_str("?filter=");
            url.push_str(&urlencoding::encode(filter));
        }
        url
    }

    /// Send one request; returns the response body (possibly empty)
    fn send(&self, method: Method, url: &str, body: Option<&Value>) -> Result<String, TransportError> {
        if self.verbose {
            eprintln!("  {} {}", method, url);
        }

        let mut request = self
            .client
            .request(method.clone(), url)
            .timeout(self.timeout)
            .header(ACCEPT, "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send()?;
        let status = response.status();
        let text = response.text()?;

        if !status.is_success() {
            return Err(TransportError::Status {
                method: method.to_string(),
                url: url.to_string(),
                status: status.as_u16(),
                detail: problem_detail(&text),
            });
        }

        Ok(text)
    }

    fn send_json(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Option<Value>, TransportError> {
        let text = self.send(method, url, body)?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn expect_body(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Value, TransportError> {
        self.send_json(method.clone(), url, body)?
            .ok_or_else(|| TransportError::UnexpectedBody {
                message: format!("{} {} returned an empty body", method, url),
            })
    }
}

impl Transport for HttpTransport {
    fn query(&self, kind: EntityKind, filter: Option<&str>) -> Result<Vec<Value>, TransportError> {
        let url = self.url(kind, None, filter);
        match self.send_json(Method::GET, &url, None)? {
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(TransportError::UnexpectedBody {
                message: format!("expected a JSON array from GET {}, got {}", url, kind_of(&other)),
            }),
            None => Ok(Vec::new()),
        }
    }

    fn fetch(&self, kind: EntityKind, id: &str) -> Result<Option<Value>, TransportError> {
        let url = self.url(kind, Some(id), None);
        Ok(self
            .send_json(Method::GET, &url, None)?
            .filter(|v| !v.is_null()))
    }

    fn create(&self, kind: EntityKind, draft: &Value) -> Result<Value, TransportError> {
        let url = self.url(kind, None, None);
        self.expect_body(Method::POST, &url, Some(draft))
    }

    fn update(&self, kind: EntityKind, id: i64, entity: &Value) -> Result<Value, TransportError> {
        let url = self.url(kind, Some(&id.to_string()), None);
        self.expect_body(Method::PUT, &url, Some(entity))
    }

    fn delete(&self, kind: EntityKind, id: i64) -> Result<(), TransportError> {
        let url = self.url(kind, Some(&id.to_string()), None);
        self.send(Method::DELETE, &url, None)?;
        Ok(())
    }
}

/// Pull a readable message out of an error body (RFC 7807 `detail`/`title`)
fn problem_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["detail", "title", "message"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(String::from)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// What the stub server saw: request head and body
    struct Seen {
        head: String,
        body: String,
    }

    /// Answer exactly one request with `status` and `body`
    fn serve_once(status: u16, body: &'static str) -> (String, mpsc::Receiver<Seen>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut head = String::new();
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                    break;
                }
                head.push_str(&line);
            }
            let length = head
                .lines()
                .filter_map(|l| l.split_once(':'))
                .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
                .and_then(|(_, v)| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            let mut buf = vec![0; length];
            reader.read_exact(&mut buf).unwrap();

            write!(
                stream,
                "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            )
            .unwrap();
            let _ = tx.send(Seen {
                head,
                body: String::from_utf8(buf).unwrap(),
            });
        });

        (base, rx)
    }

    #[test]
    fn test_url_building() {
        let t = HttpTransport::new("http://localhost:8080/");
        assert_eq!(
            t.url(EntityKind::Document, None, None),
            "http://localhost:8080/api/documents"
        );
        assert_eq!(
            t.url(EntityKind::Content, None, Some("document-is-null")),
            "http://localhost:8080/api/contents?filter=document-is-null"
        );
        assert_eq!(
            t.url(EntityKind::Car, Some("12"), None),
            "http://localhost:8080/api/cars/12"
        );
    }

    #[test]
    fn test_url_encodes_id() {
        let t = HttpTransport::new("http://h");
        assert_eq!(t.url(EntityKind::Car, Some("1/2 3"), None), "http://h/api/cars/1%2F2%203");
        assert_eq!(t.url(EntityKind::Car, Some("é"), None), "http://h/api/cars/%C3%A9");
    }

    #[test]
    fn test_empty_token_is_ignored() {
        let t = HttpTransport::new("http://h").with_token(Some(String::new()));
        assert!(t.token.is_none());
        let t = HttpTransport::new("http://h").with_token(Some("abc".into()));
        assert_eq!(t.token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_update_sends_token_and_json_body() {
        let (base, seen) = serve_once(200, r#"{"id":1,"model":"Käfer"}"#);
        let t = HttpTransport::new(&base).with_token(Some("abc".into()));

        let saved = t
            .update(EntityKind::Car, 1, &serde_json::json!({"id": 1, "model": "Käfer"}))
            .unwrap();
        assert_eq!(saved["model"], "Käfer");

        let seen = seen.recv().unwrap();
        assert!(seen.head.starts_with("PUT /api/cars/1 HTTP/1.1"));
        let head = seen.head.to_lowercase();
        assert!(head.contains("authorization: bearer abc"));
        assert!(head.contains("content-type: application/json"));
        let sent: Value = serde_json::from_str(&seen.body).unwrap();
        assert_eq!(sent["model"], "Käfer");
    }

    #[test]
    fn test_empty_fetch_is_none() {
        let (base, seen) = serve_once(200, "");
        let t = HttpTransport::new(&base);
        assert_eq!(t.fetch(EntityKind::Car, "9").unwrap(), None);
        let seen = seen.recv().unwrap();
        assert!(seen.head.starts_with("GET /api/cars/9 HTTP/1.1"));
        assert!(!seen.head.to_lowercase().contains("authorization"));
    }

    #[test]
    fn test_error_status_carries_problem_detail() {
        let (base, _seen) = serve_once(400, r#"{"title":"Bad Request","detail":"Invalid id"}"#);
        let t = HttpTransport::new(&base);
        let err = t.create(EntityKind::Car, &serde_json::json!({"id": 3})).unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert!(err.to_string().ends_with("returned HTTP 400: Invalid id"));
    }

    #[test]
    fn test_non_array_query_is_rejected() {
        let (base, _seen) = serve_once(200, r#"{"id":1}"#);
        let t = HttpTransport::new(&base);
        let err = t.query(EntityKind::Car, None).unwrap_err();
        assert!(matches!(err, TransportError::UnexpectedBody { .. }));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_unreachable_backend_has_no_status() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let t = HttpTransport::new(&format!("http://127.0.0.1:{}", port))
            .with_timeout(Duration::from_secs(2));
        let err = t.query(EntityKind::Car, None).unwrap_err();
        assert!(matches!(err, TransportError::Http(_)));
        assert_eq!(err.status(), None);
        assert!(err.to_string().starts_with("request failed"));
    }

    #[test]
    fn test_problem_detail() {
        assert_eq!(
            problem_detail(r#"{"title":"Bad Request","detail":"Invalid id"}"#),
            Some("Invalid id".to_string())
        );
        assert_eq!(problem_detail("<html>"), None);
    }

    #[test]
    fn test_status_error_display() {
        let err = TransportError::Status {
            method: "PUT".into(),
            url: "http://h/api/cars/1".into(),
            status: 400,
            detail: Some("Invalid ID".into()),
        };
        assert_eq!(err.to_string(), "PUT http://h/api/cars/1 returned HTTP 400: Invalid ID");
        assert_eq!(err.status(), Some(400));
    }
}
