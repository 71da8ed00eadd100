use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unable to parse provided URL")]
    UrlParseError(#[from] url::ParseError),

    #[error("Unable to convert provided path")]
    PathConversionError(Option<std::io::Error>),

    #[error("Unable to read file")]
    FileReadError(#[source] std::io::Error),

    #[error("Unable to get file from server")]
    ReqwestError(#[from] reqwest::Error),

    #[error("Unsupported URL scheme {0}")]
    UnsupportedScheme(String),

    #[error("No WSDL/XML response (content type \"{0}\")")]
    NotXmlResponse(String),

    #[error("Error resolving WSDL")]
    WsdlError(#[from] soapfold_wsdl::error::Error),

    #[error("Error reading XML")]
    XmlError(#[from] soapfold_util::error::Error),
}
