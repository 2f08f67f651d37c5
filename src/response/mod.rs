//! Response sinks and a buffered HTTP response.
use std::collections::HashMap;
use std::io;

pub mod status;

/// Where handlers write their response. The body is written through
/// [`io::Write`]; status and headers through the methods below.
pub trait ResponseWriter: io::Write {
    fn set_status(&mut self, status_code: u16);
    /// Set a header, replacing any existing value with the same
    /// (case-insensitive) name.
    fn set_header(&mut self, name: &str, value: &str);
    fn status_code(&self) -> u16;
}

/// An HTTP response buffered in memory.
///
/// # Example
/// ```
/// # use webpipe::response::Response;
///
/// let response = Response::new(200)
///     .with_header("Content-Type", "text/plain")
///     .with_body(b"Hello!".to_vec());
///
/// # assert_eq!(response.content_length(), 6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status_code: u16,
    pub status: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Response {
    /// Create a new Response. Status is automatically set to the default
    /// status for the given code (200 -> "OK", etc.)
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            status: status::default(status_code),
            headers: vec![],
            body: vec![],
        }
    }
    pub fn headers(&self) -> HashMap<String, String> {
        self.headers.iter().cloned().collect()
    }
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header, _)| header.eq_ignore_ascii_case(name))
            .map(|(_, value)| &value[..])
    }
    /// Change status (does not update status code).
    pub fn with_status(mut self, status: &str) -> Self {
        self.status = status.to_string();
        self
    }
    /// Add header.
    pub fn with_header(mut self, header: &str, value: &str) -> Self {
        self.set_header(header, value);
        self
    }
    /// Replace the body.
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }
    pub fn body(&self) -> &[u8] {
        &self.body
    }
    pub fn content_length(&self) -> usize {
        self.body.len()
    }
    /// Write HTTP response bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        let mut bytes: Vec<u8> = vec![];

        let status_line = format!("HTTP/1.1 {} {}\r\n", self.status_code, self.status);
        bytes.extend(status_line.into_bytes());

        for (header, value) in &self.headers {
            let header_line = format!("{}: {}\r\n", header, value);
            bytes.extend(header_line.into_bytes());
        }
        if !self.body.is_empty() && self.header("Content-Length").is_none() {
            bytes.extend(format!("Content-Length: {}\r\n", self.body.len()).into_bytes());
        }

        bytes.extend(b"\r\n");
        bytes.extend(self.body);
        bytes
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new(200)
    }
}

impl io::Write for Response {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl ResponseWriter for Response {
    fn set_status(&mut self, status_code: u16) {
        self.status_code = status_code;
        self.status = status::default(status_code);
    }
    fn set_header(&mut self, name: &str, value: &str) {
        match self
            .headers
            .iter_mut()
            .find(|(header, _)| header.eq_ignore_ascii_case(name))
        {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }
    fn status_code(&self) -> u16 {
        self.status_code
    }
}
