//! Immutable URI value.
//!
//! A [`Uri`] is built once, either empty or from a raw string, and is never
//! mutated afterwards. Every `with_*` method filters its argument, applies it
//! to a copy of the current value, re-validates the cross-component rules and
//! returns the copy:
//!
//! - scheme and host are lowercased
//! - a port equal to the scheme's default port is dropped
//! - path, query and fragment are percent-encoded
//! - `http`/`https` URIs without a host get [`HTTP_DEFAULT_HOST`]
//!
//! # Example
//!
//! ```
//! use micro_message::uri::Uri;
//!
//! let uri = Uri::parse("http://Example.com:80/a//b?x=1#f").unwrap();
//! assert_eq!(uri.host(), Some("example.com"));
//! assert_eq!(uri.port(), None);
//! assert_eq!(uri.to_string(), "http://example.com/a//b?x=1#f");
//!
//! let secure = uri.with_scheme(Some("https")).unwrap().with_port(Some(8443)).unwrap();
//! assert_eq!(secure.to_string(), "https://example.com:8443/a//b?x=1#f");
//! ```

mod encode;
mod parser;

use std::fmt;
use std::str::FromStr;

use crate::ensure;
use crate::protocol::UriError;

use encode::{encode_path, encode_query_or_fragment};
use parser::MAX_PORT;

/// Host assigned to `http` and `https` URIs that don't carry one
pub const HTTP_DEFAULT_HOST: &str = "localhost";

/// Returns the registered default port of `scheme`, if it has one.
///
/// The lookup expects a lowercase scheme, as stored by [`Uri`].
pub fn default_port(scheme: &str) -> Option<u16> {
    let port = match scheme {
        "http" => 80,
        "https" => 443,
        "ftp" => 21,
        "gopher" => 70,
        "nntp" | "news" => 119,
        "telnet" | "tn3270" => 23,
        "imap" => 143,
        "pop" => 110,
        "ldap" => 389,
        _ => return None,
    };
    Some(port)
}

/// The user information part of an authority.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UserInfo<'a> {
    pub user: &'a str,
    pub password: Option<&'a str>,
}

/// An immutable, normalized URI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Uri {
    scheme: Option<String>,
    user: Option<String>,
    password: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    path: Option<String>,
    query: Option<String>,
    fragment: Option<String>,
}

impl Uri {
    /// Creates an empty URI.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a raw URI string.
    ///
    /// Only the components present in `uri` are populated. The components are
    /// filtered the same way the `with_*` methods filter them, and a default
    /// port is dropped, but the cross-component rules are not checked.
    ///
    /// # Errors
    ///
    /// Returns [`UriError::Parse`] if `uri` is not syntactically a URI.
    pub fn parse(uri: &str) -> Result<Self, UriError> {
        let parts = parser::parse(uri)?;

        let mut new = Self {
            scheme: parts.scheme.map(str::to_ascii_lowercase),
            user: parts.user.map(str::to_string),
            password: parts.password.map(str::to_string),
            host: parts.host.map(str::to_ascii_lowercase),
            port: parts.port,
            path: parts.path.map(encode_path),
            query: parts.query.map(encode_query_or_fragment),
            fragment: parts.fragment.map(encode_query_or_fragment),
        };
        new.remove_default_port();

        Ok(new)
    }

    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// Returns `user[:password]@host[:port]`, or an empty string without a host.
    pub fn authority(&self) -> String {
        let Some(host) = self.host.as_deref() else {
            return String::new();
        };

        let mut authority = String::with_capacity(host.len() + 16);
        if let Some(user_info) = self.user_info() {
            authority.push_str(user_info.user);
            if let Some(password) = user_info.password {
                authority.push(':');
                authority.push_str(password);
            }
            authority.push('@');
        }
        authority.push_str(host);
        if let Some(port) = self.port {
            authority.push(':');
            authority.push_str(&port.to_string());
        }
        authority
    }

    /// Returns the user information, absent when no user name is set.
    pub fn user_info(&self) -> Option<UserInfo<'_>> {
        match self.user.as_deref() {
            None | Some("") => None,
            Some(user) => Some(UserInfo { user, password: self.password.as_deref() }),
        }
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Returns the explicit port, never the scheme's default one.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Returns a copy with the scheme replaced.
    ///
    /// # Errors
    ///
    /// Returns [`UriError::InvalidState`] if the result breaks a cross-component rule.
    pub fn with_scheme(&self, scheme: Option<&str>) -> Result<Self, UriError> {
        let scheme = scheme.map(str::to_ascii_lowercase);
        if self.scheme == scheme {
            return Ok(self.clone());
        }

        let mut new = self.clone();
        new.scheme = scheme;
        new.remove_default_port();
        new.validate_state()?;
        Ok(new)
    }

    /// Returns a copy with the user information replaced.
    ///
    /// # Errors
    ///
    /// Returns [`UriError::InvalidState`] if the result breaks a cross-component rule.
    pub fn with_user_info(&self, user: Option<&str>, password: Option<&str>) -> Result<Self, UriError> {
        if self.user.as_deref() == user && self.password.as_deref() == password {
            return Ok(self.clone());
        }

        let mut new = self.clone();
        new.user = user.map(str::to_string);
        new.password = password.map(str::to_string);
        new.validate_state()?;
        Ok(new)
    }

    /// Returns a copy with the host replaced.
    ///
    /// # Errors
    ///
    /// Returns [`UriError::InvalidState`] if the result breaks a cross-component rule.
    pub fn with_host(&self, host: Option<&str>) -> Result<Self, UriError> {
        let host = host.map(str::to_ascii_lowercase);
        if self.host == host {
            return Ok(self.clone());
        }

        let mut new = self.clone();
        new.host = host;
        new.validate_state()?;
        Ok(new)
    }

    /// Returns a copy with the port replaced.
    ///
    /// # Errors
    ///
    /// Returns [`UriError::InvalidPort`] if `port` is outside `1..=65535`, or
    /// [`UriError::InvalidState`] if the result breaks a cross-component rule.
    pub fn with_port(&self, port: Option<u32>) -> Result<Self, UriError> {
        let port = port.map(filter_port).transpose()?;
        if self.port == port {
            return Ok(self.clone());
        }

        let mut new = self.clone();
        new.port = port;
        new.remove_default_port();
        new.validate_state()?;
        Ok(new)
    }

    /// Returns a copy with the path replaced, percent-encoding unsafe characters.
    ///
    /// # Errors
    ///
    /// Returns [`UriError::InvalidState`] if the result breaks a cross-component rule.
    pub fn with_path(&self, path: Option<&str>) -> Result<Self, UriError> {
        let path = path.map(encode_path);
        if self.path == path {
            return Ok(self.clone());
        }

        let mut new = self.clone();
        new.path = path;
        new.validate_state()?;
        Ok(new)
    }

    /// Returns a copy with the query (without the leading `?`) replaced.
    ///
    /// The query can't break any cross-component rule, so this never fails.
    pub fn with_query(&self, query: Option<&str>) -> Self {
        let query = query.map(encode_query_or_fragment);
        if self.query == query {
            return self.clone();
        }

        Self { query, ..self.clone() }
    }

    /// Returns a copy with the fragment (without the leading `#`) replaced.
    ///
    /// The fragment can't break any cross-component rule, so this never fails.
    pub fn with_fragment(&self, fragment: Option<&str>) -> Self {
        let fragment = fragment.map(encode_query_or_fragment);
        if self.fragment == fragment {
            return self.clone();
        }

        Self { fragment, ..self.clone() }
    }

    fn remove_default_port(&mut self) {
        if self.port.is_some() && self.port == self.scheme.as_deref().and_then(default_port) {
            self.port = None;
        }
    }

    fn validate_state(&mut self) -> Result<(), UriError> {
        let no_host = self.host.as_deref().is_none_or(str::is_empty);
        if no_host && matches!(self.scheme.as_deref(), Some("http" | "https")) {
            self.host = Some(HTTP_DEFAULT_HOST.to_string());
        }

        let path = self.path.as_deref().unwrap_or_default();

        // an empty host renders no authority unless user info or a port is set
        if self.authority().is_empty() {
            ensure!(!path.starts_with("//"), UriError::invalid_state(DOUBLE_SLASH_WITHOUT_AUTHORITY));

            let first_segment = path.split('/').next().unwrap_or_default();
            ensure!(
                self.scheme.is_some() || !first_segment.contains(':'),
                UriError::invalid_state(COLON_IN_FIRST_SEGMENT)
            );
        } else {
            ensure!(path.is_empty() || path.starts_with('/'), UriError::invalid_state(RELATIVE_PATH_WITH_AUTHORITY));
        }

        Ok(())
    }
}

const DOUBLE_SLASH_WITHOUT_AUTHORITY: &str =
    r#"the path of a URI without an authority must not start with two slashes "//""#;
const COLON_IN_FIRST_SEGMENT: &str =
    "a relative URI must not have a path beginning with a segment containing a colon";
const RELATIVE_PATH_WITH_AUTHORITY: &str =
    r#"the path of a URI with an authority must start with a slash "/" or be empty"#;

fn filter_port(port: u32) -> Result<u16, UriError> {
    ensure!((1..=MAX_PORT).contains(&port), UriError::invalid_port(port));
    u16::try_from(port).map_err(|_| UriError::invalid_port(port))
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scheme) = &self.scheme {
            write!(f, "{scheme}:")?;
        }

        let authority = self.authority();
        if !authority.is_empty() || self.scheme.as_deref() == Some("file") {
            write!(f, "//{authority}")?;
        }

        if let Some(path) = &self.path {
            f.write_str(path)?;
        }

        if let Some(query) = &self.query {
            write!(f, "?{query}")?;
        }

        if let Some(fragment) = &self.fragment {
            write!(f, "#{fragment}")?;
        }

        Ok(())
    }
}

impl FromStr for Uri {
    type Err = UriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Uri {
    type Error = UriError;

    #[inline]
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

/// Converts into an `http::Uri`, dropping the fragment which `http` doesn't model.
impl TryFrom<&Uri> for http::Uri {
    type Error = UriError;

    fn try_from(uri: &Uri) -> Result<Self, Self::Error> {
        let without_fragment = uri.with_fragment(None).to_string();
        http::Uri::try_from(without_fragment.as_str()).map_err(|e| UriError::parse(&without_fragment, e))
    }
}
