//! Local HTTP stub standing in for the Kakao Local API.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

/// Canned reply for requests whose target contains a fragment.
#[derive(Debug, Clone)]
pub struct Route {
    fragment: &'static str,
    status: u16,
    body: String,
}

impl Route {
    /// Answer requests containing `fragment` with `status` and `body`.
    pub fn new(fragment: &'static str, status: u16, body: impl Into<String>) -> Self {
        Self {
            fragment,
            status,
            body: body.into(),
        }
    }
}

/// A request observed by the stub.
#[derive(Debug, Clone)]
pub struct Received {
    /// Request target: path and query.
    pub target: String,
    /// Value of the `Authorization` header, if sent.
    pub authorization: Option<String>,
}

/// Stub server serving canned replies on a loopback port.
///
/// Requests matching no route receive `200` with an empty document list.
#[derive(Debug)]
pub struct StubKakao {
    base_url: String,
    received: Arc<Mutex<Vec<Received>>>,
}

impl StubKakao {
    /// Start serving `routes` on an ephemeral port.
    pub fn start(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .unwrap_or_else(|err| panic!("failed to bind stub listener: {err}"));
        let address = listener
            .local_addr()
            .unwrap_or_else(|err| panic!("stub listener has no address: {err}"));
        let received = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&received);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                serve(stream, &routes, &log);
            }
        });
        Self {
            base_url: format!("http://{address}"),
            received,
        }
    }

    /// Base URL the provider should be configured with.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Requests received so far.
    pub fn received(&self) -> Vec<Received> {
        self.received
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

/// Base URL of a loopback port nothing listens on.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .unwrap_or_else(|err| panic!("failed to bind probe listener: {err}"));
    let address = listener
        .local_addr()
        .unwrap_or_else(|err| panic!("probe listener has no address: {err}"));
    drop(listener);
    format!("http://{address}")
}

fn serve(stream: TcpStream, routes: &[Route], log: &Mutex<Vec<Received>>) {
    let Ok(read_half) = stream.try_clone() else {
        return;
    };
    let mut reader = BufReader::new(read_half);
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    let target = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or_default()
        .to_owned();

    let mut authorization = None;
    loop {
        let mut header = String::new();
        match reader.read_line(&mut header) {
            Ok(0) | Err(_) => break,
            Ok(_) if header.trim().is_empty() => break,
            Ok(_) => {
                if let Some((name, value)) = header.split_once(':')
                    && name.trim().eq_ignore_ascii_case("authorization")
                {
                    authorization = Some(value.trim().to_owned());
                }
            }
        }
    }

    let (status, body) = routes
        .iter()
        .find(|route| target.contains(route.fragment))
        .map_or((200, r#"{"documents":[]}"#.to_owned()), |route| {
            (route.status, route.body.clone())
        });
    if let Ok(mut requests) = log.lock() {
        requests.push(Received {
            target,
            authorization,
        });
    }

    let mut writer = stream;
    let response = format!(
        "HTTP/1.1 {status} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = writer.write_all(response.as_bytes());
    let _ = writer.flush();
}
