use crate::header::Headers;

/// Protocol version used when none is given
pub const DEFAULT_PROTOCOL_VERSION: &str = "1.1";

/// The parts shared by requests and responses: protocol version and headers.
///
/// Like [`Headers`], every `with*` method returns a new head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageHead {
    protocol_version: String,
    headers: Headers,
}

impl Default for MessageHead {
    fn default() -> Self {
        Self { protocol_version: DEFAULT_PROTOCOL_VERSION.to_string(), headers: Headers::new() }
    }
}

impl MessageHead {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn protocol_version(&self) -> &str {
        &self.protocol_version
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    #[must_use]
    pub fn with_protocol_version(&self, version: &str) -> Self {
        Self { protocol_version: version.to_string(), headers: self.headers.clone() }
    }

    #[must_use]
    pub fn with_headers(&self, headers: Headers) -> Self {
        Self { protocol_version: self.protocol_version.clone(), headers }
    }

    #[must_use]
    pub fn with_header<I, V>(&self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        self.with_headers(self.headers.with(name, values))
    }

    #[must_use]
    pub fn with_added_header<I, V>(&self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        self.with_headers(self.headers.with_added(name, values))
    }

    #[must_use]
    pub fn with_header_line(&self, name: &str, line: &str) -> Self {
        self.with_headers(self.headers.with_line(name, line))
    }

    #[must_use]
    pub fn with_added_header_line(&self, name: &str, line: &str) -> Self {
        self.with_headers(self.headers.with_added_line(name, line))
    }

    #[must_use]
    pub fn without_header(&self, name: &str) -> Self {
        self.with_headers(self.headers.without(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_http_1_1() {
        let head = MessageHead::new();
        assert_eq!(head.protocol_version(), "1.1");
        assert!(head.headers().is_empty());
    }

    #[test]
    fn forwards_header_operations() {
        let head = MessageHead::new()
            .with_header("Accept", ["text/html"])
            .with_added_header_line("accept", "application/json, */*")
            .with_header_line("X-Tags", "a,b")
            .without_header("x-tags")
            .with_protocol_version("2");

        assert_eq!(head.protocol_version(), "2");
        assert_eq!(head.headers().get("ACCEPT"), ["text/html", "application/json", "*/*"]);
        assert!(!head.headers().has("X-Tags"));
    }
}
