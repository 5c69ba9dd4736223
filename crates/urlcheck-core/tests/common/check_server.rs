//! Minimal HTTP/1.1 server standing in for the check endpoint in integration tests.
//!
//! Reads one POST per connection, decodes the `{"url": ...}` body, and answers
//! according to the configured reply.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

#[derive(Debug, Clone, Copy)]
pub enum Reply {
    /// 200 with `{url, exists: true, file: false, folder: true, error: ""}`.
    Found,
    /// The given status with an empty body.
    Status(u16),
    /// 200 with a body that is not JSON.
    Garbage,
}

/// Starts a server in a background thread. Returns the endpoint URL
/// (e.g. "http://127.0.0.1:12345/checkUrl"). The server runs until the process exits.
pub fn start(reply: Reply) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            thread::spawn(move || handle(stream, reply));
        }
    });
    format!("http://127.0.0.1:{}/checkUrl", port)
}

fn handle(mut stream: std::net::TcpStream, reply: Reply) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let Some(body) = read_body(&mut stream) else {
        return;
    };
    let url = serde_json::from_slice::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("url").and_then(|u| u.as_str()).map(str::to_string))
        .unwrap_or_default();

    let response = match reply {
        Reply::Found => {
            let json = serde_json::json!({
                "url": url,
                "exists": true,
                "file": false,
                "folder": true,
                "error": ""
            })
            .to_string();
            format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                json.len(),
                json
            )
        }
        Reply::Status(code) => format!(
            "HTTP/1.1 {} Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            code
        ),
        Reply::Garbage => {
            let body = "<html>oops</html>";
            format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            )
        }
    };
    let _ = stream.write_all(response.as_bytes());
}

/// Read headers and a `Content-Length` body.
fn read_body(stream: &mut std::net::TcpStream) -> Option<Vec<u8>> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buf[..n]);
        let Some(end) = find(&data, b"\r\n\r\n") else {
            continue;
        };
        let headers = String::from_utf8_lossy(&data[..end]).to_string();
        let len = headers
            .lines()
            .filter_map(|l| l.split_once(':'))
            .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        let body_start = end + 4;
        while data.len() < body_start + len {
            let n = stream.read(&mut buf).ok()?;
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);
        }
        let body_end = (body_start + len).min(data.len());
        return Some(data[body_start..body_end].to_vec());
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
