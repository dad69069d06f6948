//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::TcpStream;
use std::path::PathBuf;
use std::time::Duration;

use soap_test_server::{ServerConfig, ServerThread};

pub const ENVELOPE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <getEmployeeCountryResponse xmlns="http://www.kdab.com/xml/MyWsdl/">
      <employeeCountry>France</employeeCountry>
    </getEmployeeCountryResponse>
  </soap:Body>
</soap:Envelope>"#;

pub const REQUEST_ENVELOPE: &str = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body><getEmployeeCountry xmlns="http://www.kdab.com/xml/MyWsdl/"><employeeName>David Faure</employeeName></getEmployeeCountry></soap:Body></soap:Envelope>"#;

/// `kdab:testpass`, base64-encoded.
pub const GOOD_CREDENTIAL: &str = "a2RhYjp0ZXN0cGFzcw==";

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("certs").join(name)
}

/// TLS config pointing at the bundled self-signed certificate.
pub fn tls_config() -> ServerConfig {
    ServerConfig::tls(
        fixture("server.pem").display().to_string(),
        fixture("server.key").display().to_string(),
    )
}

pub fn connect(server: &ServerThread) -> TcpStream {
    let stream = TcpStream::connect(server.local_addr()).unwrap();
    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    stream
}

/// SOAP 1.1 POST with a `SoapAction` header.
pub fn soap_post(action: &str, body: &str, extra_headers: &[(&str, &str)]) -> Vec<u8> {
    let mut request = format!(
        "POST /service HTTP/1.1\r\nHost: 127.0.0.1\r\nContent-Type: text/xml;charset=utf-8\r\nSoapAction: {action}\r\nContent-Length: {}\r\n",
        body.len()
    );
    for (name, value) in extra_headers {
        request.push_str(&format!("{name}: {value}\r\n"));
    }
    request.push_str("\r\n");
    request.push_str(body);
    request.into_bytes()
}

/// Status code, headers and body of one raw HTTP response.
pub struct RawResponse {
    pub status: u16,
    pub head: String,
    pub body: Vec<u8>,
}

/// Read exactly one response, framed by its `Content-Length`.
pub fn read_response(stream: &mut TcpStream) -> RawResponse {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];
    let head_end = loop {
        if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
        let n = stream.read(&mut chunk).unwrap();
        assert!(n > 0, "connection closed before response headers");
        buffer.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8(buffer[..head_end].to_vec()).unwrap();
    let length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().unwrap())
        })
        .unwrap_or(0);

    let mut body = buffer[head_end + 4..].to_vec();
    while body.len() < length {
        let n = stream.read(&mut chunk).unwrap();
        assert!(n > 0, "connection closed before response body");
        body.extend_from_slice(&chunk[..n]);
    }

    let status = head
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse().ok())
        .unwrap();
    RawResponse { status, head, body }
}

/// Send `request` on `stream` and read the response.
pub fn exchange(stream: &mut TcpStream, request: &[u8]) -> RawResponse {
    stream.write_all(request).unwrap();
    read_response(stream)
}

/// Whether the server closed `stream` without sending anything.
pub fn closed_without_reply(stream: &mut TcpStream) -> bool {
    let mut byte = [0u8; 1];
    matches!(stream.read(&mut byte), Ok(0) | Err(_))
}
