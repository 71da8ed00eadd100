use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Error reading WSDL document")]
    XmlError(#[from] soapfold_util::error::Error),

    #[error("Method \"{0}\" does not exist in the WSDL")]
    UnknownMethod(String),

    #[error("WSDL document has no {0}")]
    MissingRequiredStructure(String),
}

impl Error {
    pub(crate) fn missing<S: Into<String>>(what: S) -> Self {
        Error::MissingRequiredStructure(what.into())
    }
}
