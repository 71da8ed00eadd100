//! Folding of XML element trees into JSON objects.
//!
//! Every element folds into a single-key object named after its local name.
//! Repeated sibling names become arrays, attributes sit next to child keys and
//! text that shares an element with attributes moves under `value`.

use serde_json::{Map, Value};
use tracing::trace;

use super::{
    error,
    merge::{merge_into, MergeOptions},
    namespace::{extract_namespace, is_namespace_declaration, strip_namespace},
    xml::{self, XmlElement},
};

pub type JsonObject = Map<String, Value>;

pub const BODY: &str = "Body";
pub const VALUE: &str = "value";

fn trimmed_text(element: &XmlElement) -> String {
    let text: String = element
        .text()
        .chars()
        .filter(|c| !matches!(c, '\n' | '\r' | '\t'))
        .collect();

    text.trim().to_owned()
}

// Only direct key collisions between sibling results are arrayified; nested
// keys are not inspected.
fn fold_children(element_name: &str, element: &XmlElement) -> Result<Option<JsonObject>, error::Error> {
    let mut children = element.elements();

    let mut folded = if let Some(first) = children.next() {
        fold_element(first)?
    } else {
        return Ok(None);
    };

    for child in children {
        for (key, value) in fold_element(child)? {
            match folded.get_mut(&key) {
                Some(Value::Array(values)) => values.push(value),

                Some(existing) => {
                    let previous = std::mem::take(existing);
                    *existing = Value::Array(vec![previous, value]);
                }

                None => {
                    folded.insert(key, value);
                }
            }
        }
    }

    let mut store = Map::new();
    store.insert(element_name.to_owned(), Value::Object(folded));
    Ok(Some(store))
}

pub fn fold_element(element: &XmlElement) -> Result<JsonObject, error::Error> {
    let element_name = strip_namespace(element.name());

    if element_name.is_empty() {
        return Err(error::Error::MalformedXml(format!(
            "element <{}> has no local name",
            element.name()
        )));
    }

    trace!(element = element.name(), "folding element");

    let children = fold_children(element_name, element)?;
    let mut result = Map::new();

    let text = trimmed_text(element);
    if !text.is_empty() {
        result.insert(element_name.to_owned(), Value::String(text));
    }

    let mut attributes = element
        .attributes()
        .iter()
        .filter(|(key, _)| !is_namespace_declaration(key))
        .map(|(key, value)| (strip_namespace(key).to_owned(), Value::String(value.clone())))
        .peekable();

    if attributes.peek().is_some() {
        let mut value = Map::new();

        if let Some(text) = result.remove(element_name) {
            value.insert(VALUE.to_owned(), text);
        }

        value.extend(attributes);
        result.insert(element_name.to_owned(), Value::Object(value));
    }

    if let Some(children) = children {
        merge_into(&mut result, children, MergeOptions::default());
    }

    Ok(result)
}

/// Folds a parsed document, starting at its SOAP `Body` when there is one and
/// unwrapping the `Body` key from the result.
pub fn fold_document(root: &XmlElement) -> Result<Value, error::Error> {
    let body_name = format!("{}{}", extract_namespace(root.name(), true), BODY);
    let node = root.child_named(&body_name).unwrap_or(root);

    let mut folded = fold_element(node)?;

    Ok(match folded.remove(BODY) {
        Some(body) => body,
        None => Value::Object(folded),
    })
}

pub fn xml_to_json(xml: &str) -> Result<Value, error::Error> {
    fold_document(&xml::parse(xml)?)
}
