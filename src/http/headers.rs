//! Header parsing.
//!
//! # Responsibilities
//! - Parse the request line into method, path and version
//! - Parse `Name: value` lines into an insertion-ordered map
//! - Report malformed lines without failing the request
//!
//! # Design Decisions
//! - Header names keep the casing they were received with. Nothing is
//!   case-folded: a caller that accepts several spellings of a header must
//!   ask for each of them (see [`HeaderMap::get_any`]).
//! - The request line is stored under the synthetic keys `_path` and
//!   `_httpVersion` so captured headers can be asserted on as one map.
//! - Repeated names overwrite the earlier value in place.

use std::fmt;

use thiserror::Error;

/// Synthetic key holding the request path.
pub const PATH_KEY: &str = "_path";

/// Synthetic key holding the HTTP version token.
pub const HTTP_VERSION_KEY: &str = "_httpVersion";

/// Request methods the server understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "GET" => Some(Method::Get),
            "POST" => Some(Method::Post),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a request line could not be used.
///
/// Both cases are non-fatal: the caller logs them and carries on with an
/// empty [`HeaderMap`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderParseError {
    #[error("malformed HTTP request line: {0:?}")]
    MalformedRequestLine(String),

    #[error("unsupported HTTP method in request line: {0:?}")]
    UnsupportedMethod(String),
}

/// Case-sensitive, insertion-ordered header map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    method: Option<Method>,
    entries: Vec<(String, String)>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header, replacing the value of an identical name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    /// First non-empty value among several spellings of the same header.
    ///
    /// ```
    /// use soap_test_server::http::HeaderMap;
    ///
    /// let mut headers = HeaderMap::new();
    /// headers.insert("authorization", "Basic Zm9vOmJhcg==");
    /// assert_eq!(
    ///     headers.get_any(&["Authorization", "authorization"]),
    ///     Some("Basic Zm9vOmJhcg==")
    /// );
    /// ```
    pub fn get_any(&self, names: &[&str]) -> Option<&str> {
        names
            .iter()
            .filter_map(|name| self.get(name))
            .find(|value| !value.is_empty())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Method from the request line, when it parsed.
    pub fn method(&self) -> Option<Method> {
        self.method
    }

    pub fn path(&self) -> Option<&str> {
        self.get(PATH_KEY)
    }

    pub fn http_version(&self) -> Option<&str> {
        self.get(HTTP_VERSION_KEY)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of parsing a header block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedHeaders {
    pub headers: HeaderMap,
    /// Lines that had no colon and were skipped.
    pub malformed_lines: Vec<String>,
}

/// Parse a header block (request line plus header lines, no trailing blank line).
pub fn parse_headers(block: &[u8]) -> Result<ParsedHeaders, HeaderParseError> {
    let text = String::from_utf8_lossy(block);
    let mut lines = text.split('\n').map(strip_line_terminator);

    let request_line = lines.next().unwrap_or_default();
    let tokens: Vec<&str> = request_line.split(' ').collect();
    if tokens.len() < 3 {
        return Err(HeaderParseError::MalformedRequestLine(request_line.to_string()));
    }
    let method = Method::from_token(tokens[0])
        .ok_or_else(|| HeaderParseError::UnsupportedMethod(request_line.to_string()))?;

    let mut parsed = ParsedHeaders::default();
    parsed.headers.method = Some(method);
    parsed.headers.insert(PATH_KEY, tokens[1]);
    parsed.headers.insert(HTTP_VERSION_KEY, tokens[2]);

    for line in lines.filter(|line| !line.is_empty()) {
        match line.split_once(':') {
            Some((name, value)) => {
                let value = value.strip_prefix(' ').unwrap_or(value);
                parsed.headers.insert(name, value);
            }
            None => parsed.malformed_lines.push(line.to_string()),
        }
    }

    Ok(parsed)
}

fn strip_line_terminator(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}
