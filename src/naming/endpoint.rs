use std::fmt;

use super::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn default_port(self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }
}

/// Base URL of a naming service, split into the parts an HTTP/1.1 request needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    scheme: Scheme,
    host: String,
    port: u16,
    base_path: String,
}

impl Endpoint {
    /// Parses `scheme://host[:port][/base/path]`.
    ///
    /// Queries and fragments are rejected; a trailing slash is dropped from
    /// the base path.
    pub fn parse(url: &str) -> Result<Self, Error> {
        let invalid = |reason: &str| Error::InvalidEndpoint {
            url: url.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = url.trim();
        let (scheme, rest) = if let Some(rest) = trimmed.strip_prefix("https://") {
            (Scheme::Https, rest)
        } else if let Some(rest) = trimmed.strip_prefix("http://") {
            (Scheme::Http, rest)
        } else {
            return Err(invalid("expected an http:// or https:// URL"));
        };

        if rest.contains(['?', '#']) {
            return Err(invalid("query strings and fragments are not allowed"));
        }

        let (authority, path) = match rest.find('/') {
            Some(index) => (&rest[..index], &rest[index..]),
            None => (rest, ""),
        };
        if authority.is_empty() {
            return Err(invalid("missing host"));
        }

        let (host, port) = match authority.rsplit_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| invalid("port is not a number between 0 and 65535"))?;
                (host, port)
            }
            None => (authority, scheme.default_port()),
        };
        if host.is_empty() {
            return Err(invalid("missing host"));
        }

        Ok(Self {
            scheme,
            host: host.to_ascii_lowercase(),
            port,
            base_path: path.trim_end_matches('/').to_string(),
        })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Value of the `Host` header: the port is only spelled out when it is
    /// not the scheme default.
    pub fn host_header(&self) -> String {
        if self.port == self.scheme.default_port() {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Request target for `suffix` below the base path. `suffix` must start
    /// with `/`.
    pub fn target(&self, suffix: &str) -> String {
        format!("{}{}", self.base_path, suffix)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scheme = match self.scheme {
            Scheme::Http => "http",
            Scheme::Https => "https",
        };
        write!(f, "{scheme}://{}{}", self.host_header(), self.base_path)
    }
}

/// Percent-encodes everything outside the RFC 3986 unreserved set, so the
/// result is safe both as a path segment and as a query value.
pub fn percent_encode(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len() * 3);
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_https_endpoint_with_default_port() {
        let endpoint = Endpoint::parse("https://PubChem.ncbi.nlm.nih.gov").unwrap();
        assert_eq!(endpoint.scheme(), Scheme::Https);
        assert_eq!(endpoint.host(), "pubchem.ncbi.nlm.nih.gov");
        assert_eq!(endpoint.port(), 443);
        assert_eq!(endpoint.host_header(), "pubchem.ncbi.nlm.nih.gov");
        assert_eq!(endpoint.target("/rest"), "/rest");
    }

    #[test]
    fn keeps_explicit_port_and_base_path() {
        let endpoint = Endpoint::parse("http://127.0.0.1:8080/mirror/").unwrap();
        assert_eq!(endpoint.port(), 8080);
        assert_eq!(endpoint.host_header(), "127.0.0.1:8080");
        assert_eq!(endpoint.target("/chemical"), "/mirror/chemical");
        assert_eq!(endpoint.to_string(), "http://127.0.0.1:8080/mirror");
    }

    #[test]
    fn rejects_unsupported_urls() {
        for url in [
            "ftp://example.org",
            "example.org",
            "https://",
            "https://:443",
            "http://host:99999",
            "http://host/path?x=1",
        ] {
            assert!(
                matches!(Endpoint::parse(url), Err(Error::InvalidEndpoint { .. })),
                "accepted {url}"
            );
        }
    }

    #[test]
    fn percent_encoding_escapes_smiles_syntax() {
        assert_eq!(percent_encode("CCO"), "CCO");
        assert_eq!(
            percent_encode("C/C=C\\C[C@H](O)#N"),
            "C%2FC%3DC%5CC%5BC%40H%5D%28O%29%23N"
        );
        assert_eq!(percent_encode("c1ccccc1 +"), "c1ccccc1%20%2B");
    }
}
