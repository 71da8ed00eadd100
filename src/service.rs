use once_cell::sync::OnceCell;
use serde_json::Value;
use soapfold_wsdl::{
    types::{MethodParams, NamespaceDescriptor},
    WsdlDocument,
};
use tracing::debug;
use url::Url;

use super::{
    error,
    fetch::{self, Fetch, FetchConfig, HttpFetcher},
};

/// A WSDL document behind a URL, fetched on first use and cached for the
/// lifetime of the service.
///
/// Concurrent first calls block on a single fetch. A failed fetch is not
/// cached, so a later call tries again.
#[derive(Debug)]
pub struct WsdlService<F = HttpFetcher> {
    url: Url,
    fetcher: F,
    document: OnceCell<WsdlDocument>,
}

impl WsdlService<HttpFetcher> {
    pub fn new<S: AsRef<str>>(source: S) -> Result<Self, error::Error> {
        Self::with_config(source, &FetchConfig::default())
    }

    pub fn with_config<S: AsRef<str>>(source: S, config: &FetchConfig) -> Result<Self, error::Error> {
        Ok(Self::with_fetcher(
            fetch::source_url(source)?,
            HttpFetcher::with_config(config)?,
        ))
    }

    /// Like [`WsdlService::new`], but fetches the document straight away.
    pub fn connect<S: AsRef<str>>(source: S) -> Result<Self, error::Error> {
        let service = Self::new(source)?;
        service.document()?;
        Ok(service)
    }

    /// Folds an XML document, typically a SOAP response, into JSON. The SOAP
    /// `Body` wrapper is removed when present.
    pub fn xml_data_as_json(xml: &str) -> Result<Value, error::Error> {
        Ok(soapfold_util::xml_to_json(xml)?)
    }
}

impl<F: Fetch> WsdlService<F> {
    pub fn with_fetcher(url: Url, fetcher: F) -> Self {
        Self {
            url,
            fetcher,
            document: OnceCell::new(),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn document(&self) -> Result<&WsdlDocument, error::Error> {
        self.document
            .get_or_try_init(|| -> Result<WsdlDocument, error::Error> {
                let text = self.fetcher.fetch(&self.url)?.into_xml()?;
                let document = WsdlDocument::parse(&text)?;
                debug!(url = %self.url, prefix = document.prefix(), "cached WSDL document");
                Ok(document)
            })
    }

    pub fn all_methods(&self) -> Result<Vec<String>, error::Error> {
        Ok(self.document()?.methods()?)
    }

    pub fn namespaces(&self) -> Result<Vec<NamespaceDescriptor>, error::Error> {
        Ok(self.document()?.namespaces().into_vec())
    }

    pub fn method_params_by_name(&self, method: &str) -> Result<MethodParams, error::Error> {
        Ok(self.document()?.method_params(method)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::Payload;
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        thread,
        time::Duration,
    };

    const COUNTRY_INFO: &str = include_str!("../tests/fixtures/countryinfo.wsdl");

    struct CountingFetcher {
        content_type: &'static str,
        calls: AtomicUsize,
    }

    impl CountingFetcher {
        fn new(content_type: &'static str) -> Self {
            Self {
                content_type,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Fetch for CountingFetcher {
        fn fetch(&self, _url: &Url) -> Result<Payload, error::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(20));
            Ok(Payload::new(Some(self.content_type), COUNTRY_INFO))
        }
    }

    fn service(content_type: &'static str) -> WsdlService<CountingFetcher> {
        WsdlService::with_fetcher(
            Url::parse("http://example.com/service?WSDL").unwrap(),
            CountingFetcher::new(content_type),
        )
    }

    #[test]
    fn fetches_once_across_calls() {
        let service = service("text/xml");

        assert!(service.all_methods().unwrap().contains(&"CountryName".to_owned()));
        assert!(!service.namespaces().unwrap().is_empty());
        service.method_params_by_name("CountryName").unwrap();

        assert_eq!(service.fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn concurrent_first_access_fetches_once() {
        let service = service("text/xml; charset=utf-8");

        thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| service.all_methods().unwrap());
            }
        });

        assert_eq!(service.fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn non_xml_response_is_not_cached() {
        let service = service("text/html");

        assert!(matches!(
            service.all_methods(),
            Err(error::Error::NotXmlResponse(..))
        ));
        assert!(service.all_methods().is_err());
        assert_eq!(service.fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unknown_method_surfaces_through_service() {
        let service = service("text/xml");

        assert!(matches!(
            service.method_params_by_name("DoesNotExist"),
            Err(error::Error::WsdlError(soapfold_wsdl::error::Error::UnknownMethod(..)))
        ));
    }
}
