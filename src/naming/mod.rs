//! IUPAC name lookup through public chemistry web services.
//!
//! Naming is the one piece of chemistry the toolkit does not answer locally:
//! a SMILES string is sent to [`Provider::PubChem`] or [`Provider::Cactus`] and
//! the first line of the plain-text answer is the name.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::NamingConfig;

pub mod endpoint;
pub mod error;
pub mod http;

pub use endpoint::Endpoint;
pub use error::Error;
pub use http::{HttpClient, HttpConfig, HttpResponse};

/// Anything that can turn a SMILES string into an IUPAC name.
pub trait NameLookup {
    /// `Ok(None)` means the service does not know the structure.
    fn iupac_name(&self, smiles: &str) -> Result<Option<String>, Error>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown naming service: '{0}' (expected pubchem or cactus)")]
pub struct ParseProviderError(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// PubChem PUG REST.
    #[default]
    PubChem,
    /// NCI/CADD Chemical Identifier Resolver.
    Cactus,
}

impl Provider {
    pub fn default_endpoint(self) -> &'static str {
        match self {
            Provider::PubChem => "https://pubchem.ncbi.nlm.nih.gov",
            Provider::Cactus => "https://cactus.nci.nih.gov",
        }
    }

    /// Request target (path and query) asking for the name of `smiles`.
    pub fn request_target(self, endpoint: &Endpoint, smiles: &str) -> String {
        let encoded = endpoint::percent_encode(smiles.trim());
        match self {
            Provider::PubChem => endpoint.target(&format!(
                "/rest/pug/compound/smiles/property/IUPACName/TXT?smiles={encoded}"
            )),
            Provider::Cactus => endpoint.target(&format!("/chemical/structure/{encoded}/iupac_name")),
        }
    }

    /// Turns a service answer into a name, `None` for "not found".
    pub fn interpret(self, response: &HttpResponse) -> Result<Option<String>, Error> {
        match response.status {
            404 => Ok(None),
            status if !response.is_success() => Err(Error::Status {
                provider: self,
                status,
            }),
            _ => Ok(response
                .body
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .map(str::to_string)),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::PubChem => write!(f, "PubChem"),
            Provider::Cactus => write!(f, "CACTUS"),
        }
    }
}

impl FromStr for Provider {
    type Err = ParseProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pubchem" => Ok(Provider::PubChem),
            "cactus" | "nci" => Ok(Provider::Cactus),
            _ => Err(ParseProviderError(s.to_string())),
        }
    }
}

/// [`NameLookup`] backed by one of the web [`Provider`]s.
#[derive(Debug, Clone)]
pub struct NameResolver {
    provider: Provider,
    endpoint: Endpoint,
    client: HttpClient,
}

impl NameResolver {
    /// `endpoint` overrides the provider's public URL (mirrors, tests).
    pub fn new(provider: Provider, endpoint: Option<&str>, http: HttpConfig) -> Result<Self, Error> {
        let endpoint = Endpoint::parse(endpoint.unwrap_or(provider.default_endpoint()))?;
        Ok(Self {
            provider,
            endpoint,
            client: HttpClient::new(http),
        })
    }

    pub fn from_config(config: &NamingConfig) -> Result<Self, Error> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let http = HttpConfig {
            connect_timeout: timeout,
            read_timeout: timeout,
            max_retries: config.retries,
            ..HttpConfig::default()
        };
        Self::new(config.provider, config.endpoint.as_deref(), http)
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

impl NameLookup for NameResolver {
    fn iupac_name(&self, smiles: &str) -> Result<Option<String>, Error> {
        let target = self.provider.request_target(&self.endpoint, smiles);
        let response = self.client.get(&self.endpoint, &target)?;
        let name = self.provider.interpret(&response)?;
        debug!(provider = %self.provider, smiles, found = name.is_some(), "IUPAC lookup finished");
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::http::tests::{fast_client, reply, serve};
    use super::*;

    fn resolver(provider: Provider, endpoint: Endpoint, retries: u32) -> NameResolver {
        NameResolver {
            provider,
            endpoint,
            client: fast_client(retries),
        }
    }

    #[test]
    fn provider_parses_names() {
        assert_eq!("PubChem".parse::<Provider>().unwrap(), Provider::PubChem);
        assert_eq!("cactus".parse::<Provider>().unwrap(), Provider::Cactus);
        assert!("chemspider".parse::<Provider>().is_err());
    }

    #[test]
    fn provider_targets_follow_service_layout() {
        let endpoint = Endpoint::parse("https://example.org/api").unwrap();
        assert_eq!(
            Provider::PubChem.request_target(&endpoint, "C[C@H](N)C(=O)O"),
            "/api/rest/pug/compound/smiles/property/IUPACName/TXT?smiles=C%5BC%40H%5D%28N%29C%28%3DO%29O"
        );
        assert_eq!(
            Provider::Cactus.request_target(&endpoint, " c1ccccc1 "),
            "/api/chemical/structure/c1ccccc1/iupac_name"
        );
    }

    #[test]
    fn resolver_uses_public_endpoint_by_default() {
        let resolver = NameResolver::new(Provider::Cactus, None, HttpConfig::default()).unwrap();
        assert_eq!(resolver.endpoint().host(), "cactus.nci.nih.gov");
        assert_eq!(resolver.provider(), Provider::Cactus);
    }

    #[test]
    fn invalid_override_endpoint_is_rejected() {
        let err = NameResolver::new(Provider::PubChem, Some("pubchem"), HttpConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidEndpoint { .. }));
    }

    #[test]
    fn pubchem_name_is_first_line_of_body() {
        let (endpoint, requests) = serve(vec![reply("200 OK", "ethanol\nsecond\n")]);
        let name = resolver(Provider::PubChem, endpoint, 0).iupac_name("CCO").unwrap();
        assert_eq!(name.as_deref(), Some("ethanol"));
        assert_eq!(
            requests.recv().unwrap(),
            "GET /rest/pug/compound/smiles/property/IUPACName/TXT?smiles=CCO HTTP/1.1"
        );
    }

    #[test]
    fn not_found_and_empty_answers_are_none() {
        let (endpoint, _requests) = serve(vec![reply("404 Not Found", "PUGREST.NotFound"), reply("200 OK", "\n")]);
        let lookup = resolver(Provider::Cactus, endpoint, 0);
        assert_eq!(lookup.iupac_name("C1CC1").unwrap(), None);
        assert_eq!(lookup.iupac_name("C1CC1").unwrap(), None);
    }

    #[test]
    fn persistent_server_error_becomes_status_error() {
        let (endpoint, _requests) = serve(vec![
            reply("503 Service Unavailable", ""),
            reply("503 Service Unavailable", ""),
        ]);
        let err = resolver(Provider::PubChem, endpoint, 1).iupac_name("CCO").unwrap_err();
        assert!(matches!(
            err,
            Error::Status {
                provider: Provider::PubChem,
                status: 503
            }
        ));
        assert_eq!(err.to_string(), "PubChem answered with HTTP status 503");
    }

    #[test]
    fn bad_request_is_not_retried() {
        let (endpoint, requests) = serve(vec![reply("400 Bad Request", "")]);
        let err = resolver(Provider::PubChem, endpoint, 3).iupac_name("((").unwrap_err();
        assert!(matches!(err, Error::Status { status: 400, .. }));
        assert_eq!(requests.iter().count(), 1);
    }
}
