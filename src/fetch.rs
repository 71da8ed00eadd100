use reqwest::{blocking::Client, header::CONTENT_TYPE};
use std::{fs, path::Path, time::Duration};
use tracing::debug;
use url::Url;

use super::error;

const XML_CONTENT_TYPE: &str = "text/xml";
const XML_EXTENSIONS: [&str; 3] = ["wsdl", "xml", "xsd"];

/// Raw document text plus whatever the source reported about its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub content_type: Option<String>,
    pub body: String,
}

pub trait Fetch {
    fn fetch(&self, url: &Url) -> Result<Payload, error::Error>;
}

#[derive(Debug, Clone, Default)]
pub struct FetchConfig {
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
}

/// Fetches `http(s)` URLs with a blocking reqwest client and `file` URLs from
/// disk.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl Payload {
    pub fn new<S: Into<String>>(content_type: Option<&str>, body: S) -> Self {
        Self {
            content_type: content_type.map(ToOwned::to_owned),
            body: body.into(),
        }
    }

    pub fn is_xml(&self) -> bool {
        self.content_type
            .as_deref()
            .map_or(false, |content_type| content_type.contains("xml"))
    }

    pub fn into_xml(self) -> Result<String, error::Error> {
        if self.is_xml() {
            Ok(self.body)
        } else {
            Err(error::Error::NotXmlResponse(
                self.content_type.unwrap_or_default(),
            ))
        }
    }
}

/// Turns user input into a URL: anything that does not parse as an absolute
/// URL is taken to be a filesystem path.
pub fn source_url<S: AsRef<str>>(source: S) -> Result<Url, error::Error> {
    match Url::parse(source.as_ref()) {
        Ok(url) => Ok(url),

        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let path = Path::new(source.as_ref())
                .canonicalize()
                .map_err(|err| error::Error::PathConversionError(Some(err)))?;

            Url::from_file_path(&path).map_err(|()| error::Error::PathConversionError(None))
        }

        Err(err) => Err(err.into()),
    }
}

impl HttpFetcher {
    pub fn new() -> Result<Self, error::Error> {
        Self::with_config(&FetchConfig::default())
    }

    pub fn with_config(config: &FetchConfig) -> Result<Self, error::Error> {
        let mut builder = Client::builder();

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    fn fetch_file(&self, url: &Url) -> Result<Payload, error::Error> {
        let path = url
            .to_file_path()
            .map_err(|()| error::Error::PathConversionError(None))?;

        let body = fs::read_to_string(&path).map_err(error::Error::FileReadError)?;

        let content_type = path
            .extension()
            .and_then(|extension| extension.to_str())
            .filter(|extension| {
                XML_EXTENSIONS
                    .iter()
                    .any(|xml| extension.eq_ignore_ascii_case(xml))
            })
            .map(|_| XML_CONTENT_TYPE);

        Ok(Payload::new(content_type, body))
    }

    fn fetch_http(&self, url: &Url) -> Result<Payload, error::Error> {
        let response = self.client.get(url.clone()).send()?.error_for_status()?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned);

        Ok(Payload {
            content_type,
            body: response.text()?,
        })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<Payload, error::Error> {
        debug!(%url, "fetching document");

        match url.scheme() {
            "file" => self.fetch_file(url),
            "http" | "https" => self.fetch_http(url),
            other => Err(error::Error::UnsupportedScheme(other.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> String {
        format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
    }

    #[test]
    fn content_type_decides_xml() {
        assert!(Payload::new(Some("text/xml; charset=utf-8"), "").is_xml());
        assert!(Payload::new(Some("application/soap+xml"), "").is_xml());
        assert!(!Payload::new(Some("text/html"), "").is_xml());
        assert!(!Payload::new(None, "<a/>").is_xml());
    }

    #[test]
    fn rejects_non_xml_payload() {
        let payload = Payload::new(Some("text/html"), "<html/>");

        assert!(matches!(
            payload.into_xml(),
            Err(error::Error::NotXmlResponse(content_type)) if content_type == "text/html"
        ));
    }

    #[test]
    fn plain_paths_become_file_urls() {
        let url = source_url(fixture("countryinfo.wsdl")).unwrap();

        assert_eq!(url.scheme(), "file");
        assert!(url.path().ends_with("/tests/fixtures/countryinfo.wsdl"));
    }

    #[test]
    fn absolute_urls_pass_through() {
        let url = source_url("http://www.dneonline.com/calculator.asmx?WSDL").unwrap();

        assert_eq!(url.host_str(), Some("www.dneonline.com"));
        assert_eq!(url.query(), Some("WSDL"));
    }

    #[test]
    fn missing_path_is_reported() {
        assert!(matches!(
            source_url("does/not/exist.wsdl"),
            Err(error::Error::PathConversionError(Some(..)))
        ));
    }

    #[test]
    fn file_content_type_follows_extension() {
        let fetcher = HttpFetcher::new().unwrap();

        let wsdl = fetcher
            .fetch(&source_url(fixture("countryinfo.wsdl")).unwrap())
            .unwrap();
        assert!(wsdl.is_xml());

        let text = fetcher
            .fetch(&source_url(fixture("not_xml.txt")).unwrap())
            .unwrap();
        assert!(!text.is_xml());
    }

    #[test]
    fn unsupported_scheme_is_rejected() {
        let fetcher = HttpFetcher::new().unwrap();

        assert!(matches!(
            fetcher.fetch(&Url::parse("ftp://example.com/service.wsdl").unwrap()),
            Err(error::Error::UnsupportedScheme(scheme)) if scheme == "ftp"
        ));
    }
}
