use soapfold_util::{
    namespace::{extract_namespace, split_namespaced_name, strip_namespace},
    xml::{self, XmlElement},
};
use tracing::debug;

use super::{
    error,
    resolver::{self, Schema},
    types::{MethodParams, Namespaces, ParameterDescriptor, NAME},
};

/// A parsed WSDL 1.1 document.
///
/// Documents may bind any prefix to the WSDL namespace, so lookups of the
/// top-level sections are qualified with whatever prefix the root element uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WsdlDocument {
    root: XmlElement,
    prefix: String,
}

impl WsdlDocument {
    pub fn parse(text: &str) -> Result<Self, error::Error> {
        Ok(Self::from_root(xml::parse(text)?))
    }

    pub fn from_root(root: XmlElement) -> Self {
        let prefix = extract_namespace(root.name(), true);
        Self { root, prefix }
    }

    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    /// The root element's prefix including its separator, or an empty string.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn qualified(&self, local_name: &str) -> String {
        format!("{}{}", self.prefix, local_name)
    }

    pub fn child(&self, local_name: &str) -> Option<&XmlElement> {
        self.root.child_named(&self.qualified(local_name))
    }

    fn required(&self, local_name: &str) -> Result<&XmlElement, error::Error> {
        self.child(local_name)
            .ok_or_else(|| error::Error::missing(local_name))
    }

    /// Namespace prefixes declared on the root element, in declaration order.
    pub fn namespaces(&self) -> Namespaces {
        let attributes = self.root.attributes();
        let mut namespaces = Namespaces::default();

        for (key, value) in attributes {
            if let (Some(prefix), local_name) = split_namespaced_name(key) {
                if let Some(declared) = attributes.get(prefix) {
                    namespaces.add(prefix, declared);
                }

                namespaces.add(local_name, value);
            }
        }

        namespaces
    }

    /// Operation names of the first binding, sorted.
    pub fn methods(&self) -> Result<Vec<String>, error::Error> {
        let binding = self.required("binding")?;

        let mut methods = binding
            .children_named(&self.qualified("operation"))
            .filter_map(|operation| operation.attribute(NAME))
            .map(ToOwned::to_owned)
            .collect::<Vec<_>>();

        methods.sort();
        Ok(methods)
    }

    pub fn message(&self, name: &str) -> Option<&XmlElement> {
        self.root
            .children_named(&self.qualified("message"))
            .find(|message| message.attribute(NAME) == Some(name))
    }

    fn message_params(
        &self,
        schema: &Schema<'_>,
        operation: &XmlElement,
        direction: &str,
    ) -> Result<Vec<ParameterDescriptor>, error::Error> {
        let reference = if let Some(reference) = operation
            .child_named(&self.qualified(direction))
            .and_then(|io| io.attribute("message"))
        {
            reference
        } else {
            return Ok(Vec::new());
        };

        let name = strip_namespace(reference);
        let message = self
            .message(name)
            .ok_or_else(|| error::Error::missing(format!("message \"{}\"", name)))?;

        Ok(resolver::resolve_message(schema, message))
    }

    pub fn method_params(&self, method: &str) -> Result<MethodParams, error::Error> {
        let port_type = self.required("portType")?;

        let operation = port_type
            .child_with_attribute(NAME, method)
            .ok_or_else(|| error::Error::UnknownMethod(method.to_owned()))?;

        let schema = Schema::locate(self)?;
        debug!(method, schema_prefix = schema.prefix(), "resolving method parameters");

        Ok(MethodParams {
            request: self.message_params(&schema, operation, "input")?,
            response: self.message_params(&schema, operation, "output")?,
        })
    }
}
