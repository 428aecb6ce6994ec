//! Minimal HTTP/1.1 server for integration tests.
//!
//! Every GET returns 200 with a body derived from the request path, except
//! paths containing `missing`, which return 404.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

const NOT_ALLOWED: &[u8] =
    b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";
const NOT_FOUND: &[u8] =
    b"HTTP/1.1 404 Not Found\r\nContent-Length: 9\r\nConnection: close\r\n\r\nnot found";

/// Body served for `path`.
pub fn body_for(path: &str) -> Vec<u8> {
    format!("media bytes for {}\n", path).repeat(64).into_bytes()
}

/// Starts a server in a background thread. Returns the base URL without a
/// trailing slash (e.g. "http://127.0.0.1:12345"). Runs until the process exits.
pub fn start() -> String {
    serve(None)
}

/// Like [`start`], but bodies trickle out in small chunks so concurrent
/// downloads overlap on disk.
pub fn start_slow() -> String {
    serve(Some(Duration::from_millis(5)))
}

fn serve(chunk_delay: Option<Duration>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            thread::spawn(move || handle(stream, chunk_delay));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

fn handle(mut stream: TcpStream, chunk_delay: Option<Duration>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = String::from_utf8_lossy(&buf[..n]);
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("/");

    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(NOT_ALLOWED);
        return;
    }
    if path.contains("missing") {
        let _ = stream.write_all(NOT_FOUND);
        return;
    }
    let body = body_for(path);
    let head = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: video/mp4\r\n\
         Content-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    match chunk_delay {
        None => {
            let _ = stream.write_all(&body);
        }
        Some(delay) => {
            for chunk in body.chunks(128) {
                if stream.write_all(chunk).and_then(|_| stream.flush()).is_err() {
                    return;
                }
                thread::sleep(delay);
            }
        }
    }
}
