use soapfold_util::{
    namespace::{extract_namespace, split_namespaced_name, strip_namespace},
    xml::XmlElement,
};
use tracing::debug;

use super::{
    document::WsdlDocument,
    error,
    types::{AttributeMap, ParameterDescriptor, Params, ELEMENT, NAME, NAMESPACE, TYPE},
};

const FALLBACK_TYPES: &str = "wsdl:types";

/// The `schema` element of a document's `types` section, with the prefix its
/// own elements use.
#[derive(Debug)]
pub struct Schema<'a> {
    schema: &'a XmlElement,
    prefix: String,
    complex_types: Vec<&'a XmlElement>,
}

/// A `part` of a `message`, with its declared type or element reference split
/// into prefix and local name.
#[derive(Debug)]
pub struct Part<'a> {
    message: &'a XmlElement,
    part: &'a XmlElement,
    type_name: &'a str,
    namespace: String,
}

pub type Strategy = fn(&Schema<'_>, &Part<'_>) -> Option<ParameterDescriptor>;

/// Tried in order for every part; a part nothing matches falls back to its own
/// attributes.
pub const STRATEGIES: [(&str, Strategy); 2] = [
    ("schema element", schema_element),
    ("named complex type", named_complex_type),
];

impl<'a> Schema<'a> {
    pub fn locate(document: &'a WsdlDocument) -> Result<Self, error::Error> {
        let types = if let Some(types) = document
            .child("types")
            .or_else(|| document.root().child_named(FALLBACK_TYPES))
        {
            types
        } else {
            return Err(error::Error::missing("types"));
        };

        let prefix = if let Some(first) = types.first_element() {
            extract_namespace(first.name(), true)
        } else {
            return Err(error::Error::missing("schema"));
        };

        let schema = if let Some(schema) = types.child_named(&format!("{}schema", prefix)) {
            schema
        } else {
            return Err(error::Error::missing("schema"));
        };

        let complex_types = schema
            .children_named(&format!("{}complexType", prefix))
            .collect();

        Ok(Self {
            schema,
            prefix,
            complex_types,
        })
    }

    #[cfg(test)]
    pub(crate) fn from_element(schema: &'a XmlElement) -> Self {
        let prefix = extract_namespace(schema.name(), true);
        let complex_types = schema
            .children_named(&format!("{}complexType", prefix))
            .collect();

        Self {
            schema,
            prefix,
            complex_types,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn qualified(&self, local_name: &str) -> String {
        format!("{}{}", self.prefix, local_name)
    }
}

impl<'a> Part<'a> {
    pub fn new(message: &'a XmlElement, part: &'a XmlElement) -> Self {
        let qualified = [TYPE, ELEMENT]
            .iter()
            .filter_map(|key| part.attribute(key))
            .find(|value| !value.is_empty())
            .unwrap_or_default();

        Self {
            message,
            part,
            type_name: strip_namespace(qualified),
            namespace: extract_namespace(qualified, false),
        }
    }

    pub fn type_name(&self) -> &str {
        self.type_name
    }

    fn descriptor(&self, params: Params) -> ParameterDescriptor {
        ParameterDescriptor::new(
            self.part.attribute(NAME).unwrap_or_default(),
            self.namespace.as_str(),
            params,
        )
    }
}

/// Rewrites `type` and `element` to their local names and records the prefix
/// they carried under `namespace`. `element` is applied last, so its prefix
/// wins when both are set.
pub fn format_attributes(attributes: &AttributeMap) -> AttributeMap {
    let mut formatted = attributes.clone();
    let mut namespace = None;

    for key in [TYPE, ELEMENT] {
        if let Some(value) = formatted.get_mut(key) {
            let (prefix, local_name) = split_namespaced_name(value);
            let prefix = prefix.map(ToOwned::to_owned);
            let local_name = local_name.to_owned();

            if prefix.is_some() {
                namespace = prefix;
            }
            *value = local_name;
        }
    }

    if let Some(namespace) = namespace {
        formatted.insert(NAMESPACE.to_owned(), namespace);
    }

    formatted
}

pub fn complex_type_attributes(complex_type: &XmlElement) -> Params {
    let first = if let Some(first) = complex_type.first_element() {
        first
    } else {
        return Params::default();
    };

    let sequence_name = format!("{}sequence", extract_namespace(first.name(), true));

    match complex_type.child_named(&sequence_name) {
        Some(sequence) => Params::Sequence(
            sequence
                .elements()
                .map(|member| format_attributes(member.attributes()))
                .collect(),
        ),

        None => Params::Flat(format_attributes(complex_type.attributes())),
    }
}

pub fn schema_element(schema: &Schema<'_>, part: &Part<'_>) -> Option<ParameterDescriptor> {
    let element = schema.schema.child_with_attribute(NAME, part.type_name)?;

    if !element.has_elements() {
        return Some(
            part.descriptor(Params::default())
                .spread(format_attributes(element.attributes())),
        );
    }

    let complex_type = element.child_named(&schema.qualified("complexType"))?;
    Some(part.descriptor(complex_type_attributes(complex_type)))
}

// Matches on the message name rather than the part's type, for documents that
// declare the complex type directly instead of wrapping it in an element.
pub fn named_complex_type(schema: &Schema<'_>, part: &Part<'_>) -> Option<ParameterDescriptor> {
    let message_name = part.message.attribute(NAME)?;

    let complex_type = schema
        .complex_types
        .iter()
        .find(|complex_type| complex_type.attribute(NAME) == Some(message_name))?;

    Some(part.descriptor(complex_type_attributes(complex_type)))
}

pub fn raw_part(part: &Part<'_>) -> ParameterDescriptor {
    part.descriptor(Params::default())
        .spread(format_attributes(part.part.attributes()))
}

pub fn resolve_part(schema: &Schema<'_>, part: &Part<'_>) -> ParameterDescriptor {
    STRATEGIES
        .iter()
        .find_map(|(label, strategy)| {
            let descriptor = strategy(schema, part)?;
            debug!(part = ?part.part.attribute(NAME), strategy = label, "resolved message part");
            Some(descriptor)
        })
        .unwrap_or_else(|| {
            debug!(part = ?part.part.attribute(NAME), "no schema match, using raw part attributes");
            raw_part(part)
        })
}

pub fn resolve_message(schema: &Schema<'_>, message: &XmlElement) -> Vec<ParameterDescriptor> {
    message
        .elements()
        .map(|part| resolve_part(schema, &Part::new(message, part)))
        .collect()
}
