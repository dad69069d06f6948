//! Request framing.
//!
//! # Responsibilities
//! - Split raw request bytes into header block and body
//! - Decide when enough bytes have arrived to process a request
//!
//! # Design Decisions
//! - The splitter does no length validation; trailing bytes stay in the body
//! - The read-side completeness check only peeks at `Content-Length` so a
//!   body sent in a second segment is not cut off

use thiserror::Error;

/// Separator between header block and body.
pub const HEADER_SEPARATOR: &[u8] = b"\r\n\r\n";

/// Unusable request framing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("no header/body separator in {0} bytes of request")]
    MissingSeparator(usize),

    #[error("request starts with the header/body separator")]
    EmptyHeaderBlock,
}

/// Split a request on the first `\r\n\r\n`.
///
/// Returns `(header_block, body)`; the separator belongs to neither.
pub fn split_request(request: &[u8]) -> Result<(&[u8], &[u8]), RequestError> {
    match find_separator(request) {
        None => Err(RequestError::MissingSeparator(request.len())),
        Some(0) => Err(RequestError::EmptyHeaderBlock),
        Some(pos) => Ok((&request[..pos], &request[pos + HEADER_SEPARATOR.len()..])),
    }
}

fn find_separator(bytes: &[u8]) -> Option<usize> {
    bytes
        .windows(HEADER_SEPARATOR.len())
        .position(|window| window == HEADER_SEPARATOR)
}

/// Whether `buffer` holds a complete request.
///
/// Complete means the separator has arrived and, when the headers announce
/// a `Content-Length`, at least that many body bytes follow it.
pub fn is_complete(buffer: &[u8]) -> bool {
    let Some(pos) = find_separator(buffer) else {
        return false;
    };
    let body_len = buffer.len() - pos - HEADER_SEPARATOR.len();
    match content_length(&buffer[..pos]) {
        Some(expected) => body_len >= expected,
        None => true,
    }
}

fn content_length(header_block: &[u8]) -> Option<usize> {
    String::from_utf8_lossy(header_block)
        .split("\r\n")
        .skip(1)
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_first_separator() {
        let (headers, body) =
            split_request(b"POST / HTTP/1.1\r\nA: b\r\n\r\n<x/>\r\n\r\ntrailing").unwrap();
        assert_eq!(headers, b"POST / HTTP/1.1\r\nA: b");
        assert_eq!(body, b"<x/>\r\n\r\ntrailing");
    }

    #[test]
    fn body_may_be_empty() {
        let (headers, body) = split_request(b"GET / HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(headers, b"GET / HTTP/1.1");
        assert!(body.is_empty());
    }

    #[test]
    fn missing_separator_fails() {
        assert_eq!(
            split_request(b"GET / HTTP/1.1\r\nHost: x\r\n"),
            Err(RequestError::MissingSeparator(25))
        );
        assert_eq!(split_request(b""), Err(RequestError::MissingSeparator(0)));
    }

    #[test]
    fn separator_at_start_fails() {
        assert_eq!(
            split_request(b"\r\n\r\nGET / HTTP/1.1"),
            Err(RequestError::EmptyHeaderBlock)
        );
    }

    #[test]
    fn completeness_waits_for_separator() {
        assert!(!is_complete(b"GET / HTTP/1.1\r\nHost: x"));
        assert!(is_complete(b"GET / HTTP/1.1\r\nHost: x\r\n\r\n"));
    }

    #[test]
    fn completeness_honours_content_length() {
        let head = b"POST / HTTP/1.1\r\ncontent-length: 4\r\n\r\n".to_vec();
        assert!(!is_complete(&head));

        let mut partial = head.clone();
        partial.extend_from_slice(b"<a");
        assert!(!is_complete(&partial));

        let mut full = head;
        full.extend_from_slice(b"<a/>");
        assert!(is_complete(&full));
    }

    #[test]
    fn unparsable_content_length_is_ignored() {
        assert!(is_complete(b"POST / HTTP/1.1\r\nContent-Length: lots\r\n\r\n"));
    }
}
