//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed set of paths. Unknown paths answer 404 and every response
//! closes its connection.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    /// The body is written in this many pieces, `pause` apart.
    pub pieces: usize,
    pub pause: Duration,
}

impl Route {
    pub fn html(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: "text/html; charset=utf-8",
            body: body.into().into_bytes(),
            pieces: 1,
            pause: Duration::ZERO,
        }
    }

    pub fn bytes(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: "application/x-tar",
            body,
            pieces: 1,
            pause: Duration::ZERO,
        }
    }

    /// Like `bytes`, but the body trickles out over `pieces` writes.
    pub fn slow_bytes(body: Vec<u8>, pieces: usize, pause: Duration) -> Self {
        Self {
            pieces: pieces.max(1),
            pause,
            ..Self::bytes(body)
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: Vec::new(),
            pieces: 1,
            pause: Duration::ZERO,
        }
    }
}

/// Starts a server in a background thread. Returns the base URL without a
/// trailing slash (e.g. "http://127.0.0.1:12345"). The server runs until
/// the process exits.
pub fn start(routes: Vec<(&str, Route)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, Route>> = Arc::new(
        routes
            .into_iter()
            .map(|(path, route)| (path.to_string(), route))
            .collect(),
    );

    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            thread::spawn(move || handle(stream, &routes));
        }
    });

    format!("http://127.0.0.1:{}", port)
}

fn handle(mut stream: std::net::TcpStream, routes: &HashMap<String, Route>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));

    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };

    let path = request_path(request);
    let route = routes.get(path).cloned().unwrap_or_else(|| Route::status(404));

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        route.status,
        reason(route.status),
        route.content_type,
        route.body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();

    let piece_len = route.body.len().div_ceil(route.pieces).max(1);
    for (i, piece) in route.body.chunks(piece_len).enumerate() {
        if i > 0 {
            thread::sleep(route.pause);
        }
        if stream.write_all(piece).and_then(|_| stream.flush()).is_err() {
            return;
        }
    }
}

/// Path of the request line without its query string.
fn request_path(request: &str) -> &str {
    let target = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/");
    target.split('?').next().unwrap_or(target)
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}
