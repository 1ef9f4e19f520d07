//! Select query results returned by the cognitarium contract.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::query::Iri;

/// Response to a `select` query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectResponse {
    pub head: Head,
    pub results: Results,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Head {
    pub vars: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Results {
    pub bindings: Vec<BindingRow>,
}

/// One solution: variable name to bound value.
pub type BindingRow = BTreeMap<String, Value>;

/// A bound value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Value {
    Uri {
        value: Iri,
    },
    Literal {
        value: String,
        #[serde(rename = "xml:lang", default, skip_serializing_if = "Option::is_none")]
        lang: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        datatype: Option<Iri>,
    },
    BlankNode {
        value: String,
    },
}

impl Value {
    /// Name of the value type as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Uri { .. } => "uri",
            Value::Literal { .. } => "literal",
            Value::BlankNode { .. } => "blank_node",
        }
    }
}
