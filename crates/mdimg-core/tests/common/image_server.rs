//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed set of routes (path plus query) with a status, optional
//! `Content-Type`, and body, or a redirect. Counts requests per path so tests
//! can assert how often the network was hit.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone)]
pub enum Route {
    Body {
        status: u16,
        content_type: Option<&'static str>,
        body: Vec<u8>,
    },
    Redirect(&'static str),
}

impl Route {
    pub fn image(content_type: &'static str, body: &[u8]) -> Self {
        Route::Body {
            status: 200,
            content_type: Some(content_type),
            body: body.to_vec(),
        }
    }

    pub fn untyped(body: &[u8]) -> Self {
        Route::Body {
            status: 200,
            content_type: None,
            body: body.to_vec(),
        }
    }

    pub fn status(status: u16) -> Self {
        Route::Body {
            status,
            content_type: Some("text/plain"),
            body: b"nope".to_vec(),
        }
    }
}

pub struct ImageServer {
    base: String,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

impl ImageServer {
    /// Absolute URL for `path` (which must start with `/`).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Number of requests seen for `path`.
    pub fn hits(&self, path: &str) -> usize {
        self.hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }

    pub fn total_hits(&self) -> usize {
        self.hits.lock().unwrap().values().sum()
    }
}

/// Starts a server in a background thread. Unknown paths get 404.
/// The server runs until the process exits.
pub fn start(routes: Vec<(&'static str, Route)>) -> ImageServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, Route>> = Arc::new(
        routes
            .into_iter()
            .map(|(p, r)| (p.to_string(), r))
            .collect(),
    );
    let hits = Arc::new(Mutex::new(HashMap::new()));
    let server_hits = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let hits = Arc::clone(&server_hits);
            thread::spawn(move || handle(stream, &routes, &hits));
        }
    });
    ImageServer {
        base: format!("http://127.0.0.1:{}", port),
        hits,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    routes: &HashMap<String, Route>,
    hits: &Mutex<HashMap<String, usize>>,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    *hits.lock().unwrap().entry(path.clone()).or_insert(0) += 1;

    match routes.get(&path) {
        Some(Route::Body {
            status,
            content_type,
            body,
        }) => {
            let ct = content_type
                .map(|c| format!("Content-Type: {}\r\n", c))
                .unwrap_or_default();
            let response = format!(
                "HTTP/1.1 {} X\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
                status,
                body.len(),
                ct
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.write_all(body);
        }
        Some(Route::Redirect(location)) => {
            let response = format!(
                "HTTP/1.1 302 Found\r\nLocation: {}\r\nContent-Type: text/html\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                location
            );
            let _ = stream.write_all(response.as_bytes());
        }
        None => {
            let _ = stream.write_all(
                b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            );
        }
    }
}
