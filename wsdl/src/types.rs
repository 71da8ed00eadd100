use serde::{Deserialize, Serialize};

pub use soapfold_util::xml::Attributes as AttributeMap;

pub const NAME: &str = "name";
pub const NAMESPACE: &str = "namespace";
pub const PARAMS: &str = "params";
pub const TYPE: &str = "type";
pub const ELEMENT: &str = "element";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceDescriptor {
    pub short: String,
    pub full: String,
}

/// Namespace declarations in discovery order, unique by short name.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Namespaces(Vec<NamespaceDescriptor>);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Params {
    Sequence(Vec<AttributeMap>),
    Flat(AttributeMap),
}

/// One resolved message part.
///
/// Attributes copied from the matched schema node (or from the raw part) that
/// are not `name` or `namespace` are kept in `attributes` and serialize next
/// to the other fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub name: String,
    pub namespace: String,
    pub params: Params,
    #[serde(flatten)]
    pub attributes: AttributeMap,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodParams {
    pub request: Vec<ParameterDescriptor>,
    pub response: Vec<ParameterDescriptor>,
}

impl Namespaces {
    pub fn namespaces(&self) -> &[NamespaceDescriptor] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<NamespaceDescriptor> {
        self.0
    }

    /// Records `short`, unless it is already known. Returns whether it was added.
    pub fn add(&mut self, short: &str, full: &str) -> bool {
        if self.index_of(short).is_some() {
            return false;
        }

        self.0.push(NamespaceDescriptor {
            short: short.to_owned(),
            full: full.to_owned(),
        });
        true
    }

    pub fn get(&self, short: &str) -> Option<&str> {
        self.index_of(short).map(|index| self.0[index].full.as_str())
    }

    fn index_of(&self, short: &str) -> Option<usize> {
        self.0.iter().position(|value| value.short == short)
    }
}

impl Default for Params {
    fn default() -> Self {
        Params::Sequence(Vec::new())
    }
}

impl Params {
    pub fn is_empty(&self) -> bool {
        match self {
            Params::Sequence(members) => members.is_empty(),
            Params::Flat(attributes) => attributes.is_empty(),
        }
    }
}

impl ParameterDescriptor {
    pub fn new<N: Into<String>, S: Into<String>>(name: N, namespace: S, params: Params) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            params,
            attributes: AttributeMap::new(),
        }
    }

    /// Lays `attributes` over this descriptor: `name` and `namespace` replace
    /// the fields of the same name, everything else is added alongside.
    pub fn spread(mut self, attributes: AttributeMap) -> Self {
        for (key, value) in attributes {
            match key.as_str() {
                NAME => self.name = value,
                NAMESPACE => self.namespace = value,
                PARAMS => (),
                _ => {
                    self.attributes.insert(key, value);
                }
            }
        }

        self
    }
}
