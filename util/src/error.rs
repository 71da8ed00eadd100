use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Error parsing XML input")]
    XmlParseError(#[from] quick_xml::Error),

    #[error("Malformed XML: {0}")]
    MalformedXml(String),

    #[error("XML input contains no root element")]
    EmptyDocument,
}
