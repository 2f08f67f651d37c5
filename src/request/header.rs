use std::fmt;
use std::hash;

/// Header name, compared and hashed case-insensitively.
#[derive(Debug, Clone)]
pub struct Header(String);

impl Header {
    pub fn new(s: &str) -> Self {
        Self(s.to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Header {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Header {}

impl hash::Hash for Header {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.0.to_ascii_lowercase().hash(state);
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Header {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<Header> for String {
    fn from(s: Header) -> Self {
        s.0
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_header_case_insensitive() {
        assert_eq!(Header::new("Content-Type"), Header::new("content-type"));
        let mut headers = HashMap::new();
        headers.insert(Header::new("X-Request-Id"), "7");
        assert_eq!(headers.get(&Header::new("x-request-id")), Some(&"7"));
    }

    #[test]
    fn test_header_keeps_original_case() {
        let header = Header::new("X-Api-Key");
        assert_eq!(header.as_str(), "X-Api-Key");
        assert_eq!(String::from(header), "X-Api-Key");
    }
}
