//! Test utilities for the Overpass client.
//!
//! [`StubOverpassServer`] is a minimal blocking HTTP/1.1 server that answers
//! each connection with the next canned [`StubReply`], so retry and failover
//! behaviour can be exercised without network access.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::{Value, json};

/// Canned HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubReply {
    status: u16,
    body: String,
}

impl StubReply {
    /// `200 OK` with the given body.
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    /// Empty response with the given status.
    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
        }
    }
}

/// Local HTTP server replaying canned replies.
///
/// Replies are used in order; the last one repeats once the list runs out.
/// The server thread lives until the test process exits.
#[derive(Debug)]
pub struct StubOverpassServer {
    url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubOverpassServer {
    /// Bind to an ephemeral local port and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error when the listener cannot be bound.
    pub fn start(replies: Vec<StubReply>) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let url = format!("http://{}/api/interpreter", listener.local_addr()?);
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);
        thread::spawn(move || serve(&listener, &replies, &seen));
        Ok(Self { url, requests })
    }

    /// Interpreter URL to configure the client with.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Request bodies received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// Number of requests answered.
    pub fn hits(&self) -> usize {
        self.requests.lock().map_or(0, |requests| requests.len())
    }
}

fn serve(listener: &TcpListener, replies: &[StubReply], seen: &Mutex<Vec<String>>) {
    let fallback = StubReply::status(500);
    for (index, stream) in listener.incoming().enumerate() {
        let Ok(mut stream) = stream else {
            break;
        };
        let Ok(body) = read_request(&mut stream) else {
            continue;
        };
        if let Ok(mut requests) = seen.lock() {
            requests.push(body);
        }
        let reply = replies
            .get(index)
            .or_else(|| replies.last())
            .unwrap_or(&fallback);
        // The client may already have given up on this connection.
        let _ = write_reply(&mut stream, reply);
    }
}

fn read_request(stream: &mut TcpStream) -> std::io::Result<String> {
    let mut reader = BufReader::new(stream);
    let mut content_length = 0;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let header = line.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }
    let mut body = vec![0; content_length];
    reader.read_exact(&mut body)?;
    Ok(String::from_utf8_lossy(&body).into_owned())
}

fn write_reply(stream: &mut TcpStream, reply: &StubReply) -> std::io::Result<()> {
    let reason = match reply.status {
        200 => "OK",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Status",
    };
    write!(
        stream,
        "HTTP/1.1 {} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        reply.status,
        reply.body.len(),
        reply.body
    )?;
    stream.flush()
}

/// URL of a local port with nothing listening.
///
/// # Errors
///
/// Returns an error when no ephemeral port can be bound.
pub fn closed_endpoint() -> std::io::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let address = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{address}/api/interpreter"))
}

/// Overpass node element with the given tags.
pub fn node(id: u64, lat: f64, lon: f64, tags: &[(&str, &str)]) -> Value {
    let tags: serde_json::Map<String, Value> = tags
        .iter()
        .map(|(k, v)| ((*k).to_owned(), Value::from(*v)))
        .collect();
    json!({ "type": "node", "id": id, "lat": lat, "lon": lon, "tags": tags })
}

/// `[out:json]` payload wrapping `elements`.
pub fn payload(elements: &[Value]) -> String {
    json!({ "version": 0.6, "elements": elements }).to_string()
}
