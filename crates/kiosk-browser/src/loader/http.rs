//! Minimal HTTP/1.1 GET client.
//!
//! Supports plain HTTP over `std::net::TcpStream` and, when a
//! [`TlsProvider`] is supplied, HTTPS. Failures are reported with the
//! `net::ERR_*` codes a web view would show.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};

use kiosk_types::error::{KioskError, Result};
use url::Url;

use super::{LoaderOptions, TlsProvider};

/// Maximum response body size (8 MB).
const MAX_BODY_SIZE: usize = 8 * 1024 * 1024;

/// A fetched resource after redirects.
#[derive(Debug, Clone)]
pub struct Fetched {
    /// Final URL after redirects.
    pub url: Url,
    /// HTTP status code of the final response.
    pub status: u16,
    /// `Content-Type` header, if any.
    pub content_type: Option<String>,
    /// Decoded body.
    pub body: Vec<u8>,
}

/// A raw parsed HTTP response.
#[derive(Debug)]
pub struct HttpResponse {
    pub status_code: u16,
    /// Header names are lower-cased.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Perform an HTTP(S) GET, following redirects up to
/// `opts.max_redirects` hops.
pub fn http_get(url: &Url, opts: &LoaderOptions, tls: Option<&dyn TlsProvider>) -> Result<Fetched> {
    let mut current = url.clone();
    for _ in 0..=opts.max_redirects {
        check_scheme(&current, tls)?;
        let resp = do_request(&current, opts, tls)?;

        if is_redirect(resp.status_code)
            && let Some(location) = find_header(&resp.headers, "location")
        {
            let next = current
                .join(location)
                .map_err(|_| net_error("ERR_INVALID_REDIRECT"))?;
            log::debug!("Redirect {} -> {next}", resp.status_code);
            current = next;
            continue;
        }

        let content_type = find_header(&resp.headers, "content-type").map(str::to_string);
        return Ok(Fetched {
            url: current,
            status: resp.status_code,
            content_type,
            body: resp.body,
        });
    }

    Err(net_error("ERR_TOO_MANY_REDIRECTS"))
}

// -------------------------------------------------------------------
// Internals
// -------------------------------------------------------------------

fn check_scheme(url: &Url, tls: Option<&dyn TlsProvider>) -> Result<()> {
    match url.scheme() {
        "http" => Ok(()),
        "https" if tls.is_some() => Ok(()),
        "https" => Err(KioskError::Surface(
            "net::ERR_SSL_PROTOCOL_ERROR: TLS is not available".to_string(),
        )),
        _ => Err(net_error("ERR_UNKNOWN_URL_SCHEME")),
    }
}

/// Connect, optionally upgrade to TLS, send GET, read and parse.
fn do_request(url: &Url, opts: &LoaderOptions, tls: Option<&dyn TlsProvider>) -> Result<HttpResponse> {
    let host = url.host_str().ok_or_else(|| net_error("ERR_INVALID_URL"))?;
    // IPv6 literals come bracketed.
    let host = host.trim_start_matches('[').trim_end_matches(']');
    let port = url
        .port_or_known_default()
        .ok_or_else(|| net_error("ERR_INVALID_URL"))?;

    let stream = tcp_connect(host, port, opts)?;

    match (url.scheme(), tls) {
        ("https", Some(provider)) => {
            let mut conn = provider.connect_tls(stream, host)?;
            send_request(&mut conn, url, opts)?;
            let raw = read_response(&mut conn)?;
            parse_response(&raw)
        },
        _ => {
            let mut stream = stream;
            send_request(&mut stream, url, opts)?;
            let raw = read_response(&mut stream)?;
            parse_response(&raw)
        },
    }
}

/// Open a TCP connection with connect and read timeouts.
fn tcp_connect(host: &str, port: u16, opts: &LoaderOptions) -> Result<TcpStream> {
    let addr = (host, port)
        .to_socket_addrs()
        .map_err(|_| net_error("ERR_NAME_NOT_RESOLVED"))?
        .next()
        .ok_or_else(|| net_error("ERR_NAME_NOT_RESOLVED"))?;

    let stream =
        TcpStream::connect_timeout(&addr, opts.connect_timeout).map_err(|e| io_to_net(&e))?;
    stream
        .set_read_timeout(Some(opts.read_timeout))
        .map_err(|e| io_to_net(&e))?;
    Ok(stream)
}

/// Send an HTTP/1.1 GET request.
fn send_request(stream: &mut impl Write, url: &Url, opts: &LoaderOptions) -> Result<()> {
    let host = url.host_str().unwrap_or_default();
    let host_header = match url.port() {
        Some(p) => format!("{host}:{p}"),
        None => host.to_string(),
    };
    let path = match url.query() {
        Some(q) => format!("{}?{q}", url.path()),
        None => url.path().to_string(),
    };

    let request = format!(
        "GET {path} HTTP/1.1\r\n\
         Host: {host_header}\r\n\
         User-Agent: {}\r\n\
         Accept: text/html,text/plain;q=0.9,*/*;q=0.8\r\n\
         Connection: close\r\n\
         \r\n",
        opts.user_agent,
    );

    stream
        .write_all(request.as_bytes())
        .map_err(|e| io_to_net(&e))
}

/// Read the entire response until EOF or until the read timeout fires.
fn read_response(stream: &mut impl Read) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(8192);
    let mut chunk = [0u8; 8192];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                if buf.len() + n > MAX_BODY_SIZE + 4096 {
                    return Err(net_error("ERR_FILE_TOO_BIG"));
                }
                buf.extend_from_slice(&chunk[..n]);
            },
            Err(e)
                if !buf.is_empty()
                    && (e.kind() == io::ErrorKind::WouldBlock
                        || e.kind() == io::ErrorKind::TimedOut) =>
            {
                break;
            },
            Err(e) => return Err(io_to_net(&e)),
        }
    }
    if buf.is_empty() {
        return Err(net_error("ERR_EMPTY_RESPONSE"));
    }
    Ok(buf)
}

/// Parse raw bytes into status code, headers, and body.
pub fn parse_response(data: &[u8]) -> Result<HttpResponse> {
    let header_end =
        find_subsequence(data, b"\r\n\r\n").ok_or_else(|| net_error("ERR_INVALID_HTTP_RESPONSE"))?;

    let header_str = std::str::from_utf8(&data[..header_end])
        .map_err(|_| net_error("ERR_INVALID_HTTP_RESPONSE"))?;
    let mut lines = header_str.split("\r\n");

    let status_line = lines
        .next()
        .ok_or_else(|| net_error("ERR_INVALID_HTTP_RESPONSE"))?;
    let status_code = parse_status_line(status_line)?;

    let mut headers = Vec::new();
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_lowercase(), value.trim().to_string()));
        }
    }

    let raw_body = &data[header_end + 4..];
    let body = if find_header(&headers, "transfer-encoding").is_some_and(|v| v.contains("chunked"))
    {
        decode_chunked(raw_body)?
    } else if let Some(cl) = find_header(&headers, "content-length") {
        let len: usize = cl
            .parse()
            .map_err(|_| net_error("ERR_INVALID_HTTP_RESPONSE"))?;
        if len > MAX_BODY_SIZE {
            return Err(net_error("ERR_FILE_TOO_BIG"));
        }
        raw_body[..raw_body.len().min(len)].to_vec()
    } else {
        raw_body.to_vec()
    };

    if body.len() > MAX_BODY_SIZE {
        return Err(net_error("ERR_FILE_TOO_BIG"));
    }

    Ok(HttpResponse {
        status_code,
        headers,
        body,
    })
}

/// Parse the status code from `HTTP/1.x NNN reason`.
fn parse_status_line(line: &str) -> Result<u16> {
    let mut parts = line.splitn(3, ' ');
    let version = parts.next().unwrap_or_default();
    if !version.starts_with("HTTP/") {
        return Err(net_error("ERR_INVALID_HTTP_RESPONSE"));
    }
    parts
        .next()
        .and_then(|code| code.parse().ok())
        .ok_or_else(|| net_error("ERR_INVALID_HTTP_RESPONSE"))
}

/// Case-insensitive header lookup.
fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Decode a chunked transfer-encoded body.
fn decode_chunked(data: &[u8]) -> Result<Vec<u8>> {
    let mut result = Vec::new();
    let mut pos = 0;

    while let Some(i) = find_subsequence(&data[pos..], b"\r\n") {
        let line_end = pos + i;
        let size_line = std::str::from_utf8(&data[pos..line_end])
            .map_err(|_| net_error("ERR_INVALID_CHUNKED_ENCODING"))?;
        // Chunk extensions follow `;`.
        let size_str = size_line.split(';').next().unwrap_or_default().trim();
        let chunk_size = usize::from_str_radix(size_str, 16)
            .map_err(|_| net_error("ERR_INVALID_CHUNKED_ENCODING"))?;

        if chunk_size == 0 {
            break;
        }

        if chunk_size > MAX_BODY_SIZE {
            return Err(net_error("ERR_INVALID_CHUNKED_ENCODING"));
        }
        let chunk_start = line_end + 2;
        let chunk_end = chunk_start
            .checked_add(chunk_size)
            .ok_or_else(|| net_error("ERR_INVALID_CHUNKED_ENCODING"))?;
        if chunk_end > data.len() {
            // Partial chunk -- take what we have.
            result.extend_from_slice(&data[chunk_start..]);
            break;
        }
        if result.len() + chunk_size > MAX_BODY_SIZE {
            return Err(net_error("ERR_FILE_TOO_BIG"));
        }
        result.extend_from_slice(&data[chunk_start..chunk_end]);
        pos = (chunk_end + 2).min(data.len());
    }

    Ok(result)
}

fn is_redirect(status: u16) -> bool {
    matches!(status, 301 | 302 | 303 | 307 | 308)
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// A `net::` error as a surface error.
pub(crate) fn net_error(code: &str) -> KioskError {
    KioskError::Surface(format!("net::{code}"))
}

/// Map a socket error to the matching `net::` code.
fn io_to_net(e: &io::Error) -> KioskError {
    match e.kind() {
        io::ErrorKind::ConnectionRefused => net_error("ERR_CONNECTION_REFUSED"),
        io::ErrorKind::ConnectionReset => net_error("ERR_CONNECTION_RESET"),
        io::ErrorKind::ConnectionAborted => net_error("ERR_CONNECTION_ABORTED"),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => net_error("ERR_TIMED_OUT"),
        io::ErrorKind::AddrNotAvailable => net_error("ERR_ADDRESS_UNREACHABLE"),
        _ => KioskError::Surface(format!("net::ERR_FAILED: {e}")),
    }
}
