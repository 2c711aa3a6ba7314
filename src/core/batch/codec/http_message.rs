//! HTTP/1.1 messages embedded in MIME parts (`application/http`)

use crate::core::batch::SubResponse;
use crate::utils::error::{GatewayError, Result};
use actix_web::http::Method;
use actix_web::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use bytes::{BufMut, Bytes, BytesMut};
use url::Url;

/// Request line, headers and body of an embedded request
#[derive(Debug)]
pub struct ParsedRequest {
    pub method: Method,
    /// Request target as written: origin-form (`/api/User`) or absolute
    pub target: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Split at the blank line ending the header block
fn split_head(raw: &[u8]) -> (&[u8], &[u8]) {
    if let Some(pos) = find(raw, b"\r\n\r\n") {
        (&raw[..pos], &raw[pos + 4..])
    } else if let Some(pos) = find(raw, b"\n\n") {
        (&raw[..pos], &raw[pos + 2..])
    } else {
        (raw, &[])
    }
}

/// Parse one serialized HTTP/1.x request
pub fn parse_request(raw: &[u8]) -> Result<ParsedRequest> {
    // blank lines before the request line are tolerated, as in HTTP/1.1
    let start = raw
        .iter()
        .position(|b| *b != b'\r' && *b != b'\n')
        .ok_or_else(|| GatewayError::decode("Embedded HTTP request is empty"))?;
    let (head, body) = split_head(&raw[start..]);
    let head = std::str::from_utf8(head)
        .map_err(|_| GatewayError::decode("Embedded HTTP request head is not valid UTF-8"))?;

    let mut lines = head.lines();
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let (method, target, version) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(method), Some(target), Some(version), None) => (method, target, version),
        _ => {
            return Err(GatewayError::decode(format!(
                "Invalid request line '{}'",
                request_line
            )));
        }
    };
    if !version.starts_with("HTTP/1.") {
        return Err(GatewayError::decode(format!(
            "Unsupported HTTP version '{}'",
            version
        )));
    }
    let method = Method::from_bytes(method.as_bytes())
        .map_err(|_| GatewayError::decode(format!("Invalid HTTP method '{}'", method)))?;

    let headers = parse_headers(lines)?;
    let body = frame_body(body, &headers)?;

    Ok(ParsedRequest {
        method,
        target: target.to_string(),
        headers,
        body,
    })
}

fn parse_headers<'a>(lines: impl Iterator<Item = &'a str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| GatewayError::decode(format!("Invalid header line '{}'", line)))?;
        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .map_err(|_| GatewayError::decode(format!("Invalid header name '{}'", name)))?;
        let value = HeaderValue::from_str(value.trim())
            .map_err(|_| GatewayError::decode(format!("Invalid value for header '{}'", name)))?;
        headers.append(name, value);
    }
    Ok(headers)
}

/// Body bytes, honouring `Content-Length` when the part declares one
fn frame_body(body: &[u8], headers: &HeaderMap) -> Result<Option<Bytes>> {
    let body = match headers.get(header::CONTENT_LENGTH) {
        Some(value) => {
            let length: usize = value
                .to_str()
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .ok_or_else(|| GatewayError::decode("Invalid Content-Length"))?;
            if length > body.len() {
                return Err(GatewayError::decode(format!(
                    "Embedded body is truncated: expected {} bytes, found {}",
                    length,
                    body.len()
                )));
            }
            &body[..length]
        }
        None => body,
    };

    if body.is_empty() {
        Ok(None)
    } else {
        Ok(Some(Bytes::copy_from_slice(body)))
    }
}

/// Absolute URL for a request target
///
/// Origin-form targets are resolved against the part's `Host` header, falling
/// back to the batch endpoint's own authority.
pub fn resolve_target(target: &str, headers: &HeaderMap, base: &Url) -> Result<Url> {
    if let Ok(url) = Url::parse(target) {
        return Ok(url);
    }

    let authority = match headers.get(header::HOST).and_then(|h| h.to_str().ok()) {
        Some(host) => format!("{}://{}/", base.scheme(), host),
        None => base.origin().ascii_serialization() + "/",
    };
    let root = Url::parse(&authority)
        .map_err(|e| GatewayError::decode(format!("Invalid Host '{}': {}", authority, e)))?;
    root.join(target)
        .map_err(|e| GatewayError::decode(format!("Invalid request target '{}': {}", target, e)))
}

/// `content-type` → `Content-Type`
pub fn canonical_name(name: &HeaderName) -> String {
    name.as_str()
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Serialize a sub-response as an HTTP/1.1 message
pub fn write_response(response: &SubResponse, out: &mut BytesMut) {
    let reason = response.status.canonical_reason().unwrap_or("");
    out.put_slice(format!("HTTP/1.1 {} {}\r\n", response.status.as_u16(), reason).as_bytes());

    for (name, value) in response.headers.iter() {
        out.put_slice(canonical_name(name).as_bytes());
        out.put_slice(b": ");
        out.put_slice(value.as_bytes());
        out.put_slice(b"\r\n");
    }

    if let Some(body) = &response.body {
        if !response.headers.contains_key(header::CONTENT_LENGTH) {
            out.put_slice(format!("Content-Length: {}\r\n", body.len()).as_bytes());
        }
        out.put_slice(b"\r\n");
        out.put_slice(body);
    } else {
        out.put_slice(b"\r\n");
    }
}
