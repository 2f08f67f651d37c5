//! HTTP request as handed over by the transport.
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

pub use header::*;

pub mod header;

/// An HTTP Request.
///
/// # Example
/// ```
/// use webpipe::request::{Method, Request};
///
/// let request = Request::new(Method::POST, "/person")
///     .with_query("dry_run=1")
///     .with_header("Content-Type", "application/json")
///     .with_body(b"{\"name\":\"Bob\"}".to_vec());
///
/// # assert_eq!(request.header("content-type"), Some(&"application/json".to_string()));
/// # assert_eq!(request.content_length(), 14);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub query: String,
    pub headers: HashMap<Header, String>,
    pub body: Option<Vec<u8>>,
}

impl Default for Request {
    fn default() -> Self {
        Self::new(Method::GET, "/").with_header("Host", "localhost")
    }
}

impl Request {
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            query: "".to_string(),
            headers: HashMap::new(),
            body: None,
        }
    }
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(Header::new(name), value.to_string());
        self
    }
    pub fn with_query(mut self, query: &str) -> Self {
        self.query = query.to_string();
        self
    }
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&String> {
        self.headers.get(&Header::new(name))
    }
    pub fn content_length(&self) -> usize {
        self.body.as_ref().map_or(0, |body| body.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    GET,
    HEAD,
    POST,
    PUT,
    PATCH,
    DELETE,
    CONNECT,
    OPTIONS,
    TRACE,
}

impl FromStr for Method {
    type Err = MethodParseError;
    fn from_str(s: &str) -> Result<Method, MethodParseError> {
        match s {
            "GET" => Ok(Method::GET),
            "HEAD" => Ok(Method::HEAD),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "PATCH" => Ok(Method::PATCH),
            "DELETE" => Ok(Method::DELETE),
            "CONNECT" => Ok(Method::CONNECT),
            "OPTIONS" => Ok(Method::OPTIONS),
            "TRACE" => Ok(Method::TRACE),
            _ => Err(MethodParseError::new(s)),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodParseError {
    method: String,
}

impl MethodParseError {
    pub fn new(method: &str) -> Self {
        Self {
            method: method.to_string(),
        }
    }
}

impl fmt::Display for MethodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid HTTP method: {:?}", self.method)
    }
}

impl std::error::Error for MethodParseError {}
