pub mod document;
pub mod error;
pub mod resolver;
pub mod types;

pub use document::WsdlDocument;

pub fn parse<S: AsRef<str>>(text: S) -> Result<WsdlDocument, error::Error> {
    WsdlDocument::parse(text.as_ref())
}
