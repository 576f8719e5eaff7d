//! Blocking HTTP/1.1 GET client used by the naming providers.
//!
//! Requests are sent with `Connection: close` and the response is read until
//! the server closes the stream. `https` endpoints go through rustls when the
//! `tls` feature is enabled.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::thread;
use std::time::Duration;

use tracing::debug;

use super::endpoint::{Endpoint, Scheme};
use super::Error;

const USER_AGENT: &str = concat!("aromaticity/", env!("CARGO_PKG_VERSION"));

/// A parsed HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn is_retryable(&self) -> bool {
        self.status >= 500 || self.status == 429
    }
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    /// Extra attempts after the first one.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each further retry.
    pub retry_delay: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(10),
            max_retries: 2,
            retry_delay: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    config: HttpConfig,
}

impl HttpClient {
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// GETs `target` (path plus query) from `endpoint`.
    ///
    /// Network failures, 5xx and 429 answers are retried with exponential
    /// backoff. Once retries are exhausted the last retryable response is
    /// returned as is, so the caller decides what the status means.
    pub fn get(&self, endpoint: &Endpoint, target: &str) -> Result<HttpResponse, Error> {
        let mut delay = self.config.retry_delay;
        let mut attempt = 0;

        loop {
            if attempt > 0 {
                thread::sleep(delay);
                delay = delay.saturating_mul(2);
            }
            let last_attempt = attempt == self.config.max_retries;
            attempt += 1;

            debug!(endpoint = %endpoint, path = target, attempt, "sending GET request");
            match self.send(endpoint, target) {
                Ok(response) if response.is_retryable() && !last_attempt => {
                    debug!(status = response.status, "retryable status, trying again");
                }
                Ok(response) => {
                    debug!(status = response.status, bytes = response.body.len(), "response received");
                    return Ok(response);
                }
                Err(err) if err.is_transient() && !last_attempt => {
                    debug!(error = %err, "request failed, trying again");
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn send(&self, endpoint: &Endpoint, target: &str) -> Result<HttpResponse, Error> {
        let stream = self.connect(endpoint)?;
        let request = build_request(endpoint, target);

        match endpoint.scheme() {
            Scheme::Http => exchange(endpoint.host(), stream, &request),
            Scheme::Https => self.send_tls(endpoint, stream, &request),
        }
    }

    fn connect(&self, endpoint: &Endpoint) -> Result<TcpStream, Error> {
        let host = endpoint.host();
        let address = format!("{}:{}", host, endpoint.port());
        let candidates = (host, endpoint.port())
            .to_socket_addrs()
            .map_err(|source| Error::Resolve {
                host: host.to_string(),
                source,
            })?;

        let mut last_error = io::Error::new(io::ErrorKind::NotFound, "no addresses resolved");
        for candidate in candidates {
            match TcpStream::connect_timeout(&candidate, self.config.connect_timeout) {
                Ok(stream) => {
                    stream
                        .set_read_timeout(Some(self.config.read_timeout))
                        .and_then(|_| stream.set_write_timeout(Some(self.config.read_timeout)))
                        .map_err(|source| Error::Io {
                            host: host.to_string(),
                            source,
                        })?;
                    return Ok(stream);
                }
                Err(err) if err.kind() == io::ErrorKind::TimedOut => {
                    return Err(Error::Timeout {
                        host: host.to_string(),
                    })
                }
                Err(err) => last_error = err,
            }
        }

        Err(Error::Connect {
            address,
            source: last_error,
        })
    }

    #[cfg(feature = "tls")]
    fn send_tls(
        &self,
        endpoint: &Endpoint,
        stream: TcpStream,
        request: &str,
    ) -> Result<HttpResponse, Error> {
        use std::sync::Arc;

        let host = endpoint.host();
        let tls_error = |message: String| Error::Tls {
            host: host.to_string(),
            message,
        };

        let root_store = rustls::RootCertStore {
            roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
        };
        let config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();
        let server_name = rustls::pki_types::ServerName::try_from(host.to_string())
            .map_err(|_| tls_error(format!("invalid server name '{host}'")))?;
        let connection = rustls::ClientConnection::new(Arc::new(config), server_name)
            .map_err(|err| tls_error(err.to_string()))?;

        exchange(host, rustls::StreamOwned::new(connection, stream), request)
    }

    #[cfg(not(feature = "tls"))]
    fn send_tls(
        &self,
        endpoint: &Endpoint,
        _stream: TcpStream,
        _request: &str,
    ) -> Result<HttpResponse, Error> {
        Err(Error::TlsNotCompiled {
            host: endpoint.host().to_string(),
        })
    }
}

fn build_request(endpoint: &Endpoint, target: &str) -> String {
    format!(
        "GET {target} HTTP/1.1\r\n\
         Host: {}\r\n\
         User-Agent: {USER_AGENT}\r\n\
         Accept: text/plain\r\n\
         Connection: close\r\n\
         \r\n",
        endpoint.host_header()
    )
}

fn exchange<S: Read + Write>(host: &str, mut stream: S, request: &str) -> Result<HttpResponse, Error> {
    let io_error = |source: io::Error| match source.kind() {
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => Error::Timeout {
            host: host.to_string(),
        },
        _ => Error::Io {
            host: host.to_string(),
            source,
        },
    };

    stream
        .write_all(request.as_bytes())
        .and_then(|_| stream.flush())
        .map_err(io_error)?;

    let mut buffer = Vec::new();
    let mut chunk = [0u8; 8192];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => buffer.extend_from_slice(&chunk[..n]),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            // Servers that skip close_notify still delivered a full response.
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof && !buffer.is_empty() => break,
            Err(err) => return Err(io_error(err)),
        }
    }

    parse_response(&buffer)
}

fn parse_response(buffer: &[u8]) -> Result<HttpResponse, Error> {
    let header_end = find(buffer, b"\r\n\r\n")
        .ok_or_else(|| Error::MalformedResponse("no header/body separator".to_string()))?;

    let head = String::from_utf8_lossy(&buffer[..header_end]);
    let mut lines = head.lines();
    let status_line = lines
        .next()
        .ok_or_else(|| Error::MalformedResponse("empty response".to_string()))?;
    let status = parse_status_line(status_line)?;

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .collect();

    let raw_body = &buffer[header_end + 4..];
    let chunked = headers.iter().any(|(name, value)| {
        name.eq_ignore_ascii_case("transfer-encoding") && value.to_ascii_lowercase().contains("chunked")
    });
    let body = if chunked {
        decode_chunked(raw_body)?
    } else {
        raw_body.to_vec()
    };

    Ok(HttpResponse {
        status,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn parse_status_line(line: &str) -> Result<u16, Error> {
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(version), Some(code)) if version.starts_with("HTTP/") => code
            .parse()
            .map_err(|_| Error::MalformedResponse(format!("invalid status code '{code}'"))),
        _ => Err(Error::MalformedResponse(format!("invalid status line '{line}'"))),
    }
}

/// Chunk sizes count bytes, so the body is reassembled before any UTF-8 decoding.
fn decode_chunked(body: &[u8]) -> Result<Vec<u8>, Error> {
    let mut decoded = Vec::new();
    let mut remaining = body;

    loop {
        let size_end = find(remaining, b"\r\n")
            .ok_or_else(|| Error::MalformedResponse("truncated chunk header".to_string()))?;
        let size_line = String::from_utf8_lossy(&remaining[..size_end]);
        let size_field = size_line.split(';').next().unwrap_or_default().trim();
        let size = usize::from_str_radix(size_field, 16)
            .map_err(|_| Error::MalformedResponse(format!("invalid chunk size '{size_field}'")))?;
        if size == 0 {
            break;
        }

        let start = size_end + 2;
        let end = start
            .checked_add(size)
            .filter(|&end| end <= remaining.len())
            .ok_or_else(|| {
                Error::MalformedResponse(format!(
                    "chunk of {size} bytes truncated after {} bytes",
                    remaining.len().saturating_sub(start)
                ))
            })?;
        decoded.extend_from_slice(&remaining[start..end]);
        remaining = remaining.get(end + 2..).unwrap_or_default();
    }

    Ok(decoded)
}
