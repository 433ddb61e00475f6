//! Test utilities for HTTP geocoding.
//!
//! [`StubServer`] is a minimal HTTP/1.1 server on a loopback port that replays
//! canned responses, letting tests exercise [`crate::HttpGeocoder`] end to end
//! without a real Nominatim instance.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

/// How the body of a [`StubResponse`] reaches the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyDelivery {
    Whole,
    /// Send `sent` bytes, pause, then send the rest.
    Stalled { sent: usize, pause: Duration },
    /// Send `sent` bytes, then close the connection.
    Truncated { sent: usize },
}

/// One canned HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubResponse {
    status: u16,
    body: String,
    delay: Duration,
    delivery: BodyDelivery,
}

impl StubResponse {
    /// A `200 OK` JSON response with the given body.
    #[must_use]
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            delay: Duration::ZERO,
            delivery: BodyDelivery::Whole,
        }
    }

    /// A response with an arbitrary status and body.
    #[must_use]
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: Duration::ZERO,
            delivery: BodyDelivery::Whole,
        }
    }

    /// Wait `delay` before answering, to provoke client timeouts.
    #[must_use]
    pub const fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Send the headers and the first `sent` body bytes, then pause for
    /// `pause` before sending the rest.
    #[must_use]
    pub const fn stalled_after(mut self, sent: usize, pause: Duration) -> Self {
        self.delivery = BodyDelivery::Stalled { sent, pause };
        self
    }

    /// Send the headers and the first `sent` body bytes, then hang up while
    /// the declared `Content-Length` is still outstanding.
    #[must_use]
    pub const fn truncated_after(mut self, sent: usize) -> Self {
        self.delivery = BodyDelivery::Truncated { sent };
        self
    }
}

/// Loopback server answering one connection per scripted response.
///
/// Every connection carries one request and is closed after its response.
/// The request target (path and query) of each connection is recorded.
///
/// # Example
///
/// ```
/// use hubmatch_core::Geocoder;
/// use hubmatch_geocode::HttpGeocoder;
/// use hubmatch_geocode::test_support::{StubResponse, StubServer};
///
/// let server = StubServer::start(vec![StubResponse::json(
///     r#"[{"lat": "13.0358", "lon": "77.5970"}]"#,
/// )])?;
/// let geocoder = HttpGeocoder::new(server.base_url())?;
///
/// let coordinate = geocoder.geocode("Hebbal")?;
/// assert!(coordinate.is_some());
/// assert_eq!(server.requests().len(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct StubServer {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    /// Bind a loopback port and serve `responses` in order, one per
    /// connection.
    ///
    /// # Errors
    ///
    /// Returns an error if no loopback port can be bound.
    pub fn start(responses: Vec<StubResponse>) -> io::Result<Self> {
        let connections = responses.len();
        let mut script = responses.into_iter();
        Self::spawn(connections, move |_| {
            script.next().unwrap_or_else(|| StubResponse::json("[]"))
        })
    }

    /// Bind a loopback port and answer `connections` requests by matching the
    /// request target against `routes`.
    ///
    /// The first route whose key occurs in the target wins; unmatched
    /// requests receive an empty candidate list. Routing by target keeps
    /// answers stable when requests arrive concurrently.
    ///
    /// # Errors
    ///
    /// Returns an error if no loopback port can be bound.
    pub fn routed(routes: Vec<(String, StubResponse)>, connections: usize) -> io::Result<Self> {
        Self::spawn(connections, move |target| {
            routes
                .iter()
                .find(|(key, _)| target.contains(key.as_str()))
                .map_or_else(|| StubResponse::json("[]"), |(_, response)| response.clone())
        })
    }

    fn spawn<F>(connections: usize, mut respond: F) -> io::Result<Self>
    where
        F: FnMut(&str) -> StubResponse + Send + 'static,
    {
        let listener = TcpListener::bind(("127.0.0.1", 0))?;
        let base_url = format!("http://{}", listener.local_addr()?);
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);
        thread::spawn(move || {
            for _ in 0..connections {
                let Ok((stream, _)) = listener.accept() else {
                    return;
                };
                let Ok(target) = read_target(&stream) else {
                    continue;
                };
                log.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(target.clone());
                let response = respond(&target);
                // Answer on a separate thread so a delayed reply does not
                // hold up the next connection.
                thread::spawn(move || {
                    // A client that hung up early is not the server's problem.
                    let _ignored = reply(stream, &response);
                });
            }
        });
        Ok(Self { base_url, requests })
    }

    /// Base URL to hand to the geocoder, e.g. `http://127.0.0.1:41234`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request targets received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn read_target(stream: &TcpStream) -> io::Result<String> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    let target = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or_default()
        .to_owned();

    let mut header = String::new();
    while reader.read_line(&mut header)? > 0 && !header.trim_end().is_empty() {
        header.clear();
    }
    Ok(target)
}

fn reply(mut stream: TcpStream, response: &StubResponse) -> io::Result<()> {
    thread::sleep(response.delay);
    let body = response.body.as_bytes();
    write!(
        stream,
        "HTTP/1.1 {} STUB\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        response.status,
        body.len()
    )?;
    match response.delivery {
        BodyDelivery::Whole => stream.write_all(body)?,
        BodyDelivery::Stalled { sent, pause } => {
            let (head, tail) = body.split_at_checked(sent).unwrap_or((body, b"".as_slice()));
            stream.write_all(head)?;
            stream.flush()?;
            thread::sleep(pause);
            stream.write_all(tail)?;
        }
        BodyDelivery::Truncated { sent } => {
            let (head, _) = body.split_at_checked(sent).unwrap_or((body, b"".as_slice()));
            stream.write_all(head)?;
        }
    }
    stream.flush()
}
