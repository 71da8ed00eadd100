pub mod error;
pub mod merge;
pub mod namespace;
pub mod soap;
pub mod xml;

pub use soap::xml_to_json;
pub use xml::{XmlElement, XmlNode};
