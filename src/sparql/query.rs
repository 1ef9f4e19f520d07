//! Select query model understood by the cognitarium contract.
//!
//! The types serialize to the contract's JSON query schema. Struct fields
//! are declared in the order the schema emits them, so a query always
//! encodes to the same bytes.

use serde::{Deserialize, Serialize};

/// Base IRI of the axone ontology.
pub const W3ID_PREFIX: &str = "https://w3id.org/axone/ontology/v4";

/// Credential body predicates used by the dataverse.
pub const VC_BODY_SUBJECT: &str = "dataverse:credential:body#subject";
pub const VC_BODY_TYPE: &str = "dataverse:credential:body#type";
pub const VC_BODY_CLAIM: &str = "dataverse:credential:body#claim";

/// Variable bound to the governance code URI.
pub const CODE_VARIABLE: &str = "code";

/// An IRI, either absolute or expressed with a declared prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Iri {
    Full(String),
    Prefixed(String),
}

/// A `PREFIX` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prefix {
    pub namespace: String,
    pub prefix: String,
}

/// An item of the select clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectItem {
    Variable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    NamedNode(Iri),
    BlankNode(String),
}

/// Subject position of a triple pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VarOrNode {
    Variable(String),
    Node(Node),
}

/// Predicate position of a triple pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VarOrNamedNode {
    Variable(String),
    NamedNode(Iri),
}

/// Object position of a triple pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VarOrNodeOrLiteral {
    Variable(String),
    Node(Node),
}

impl VarOrNode {
    pub fn var(name: &str) -> Self {
        Self::Variable(name.to_string())
    }
}

impl VarOrNamedNode {
    pub fn full(iri: &str) -> Self {
        Self::NamedNode(Iri::Full(iri.to_string()))
    }

    pub fn prefixed(iri: &str) -> Self {
        Self::NamedNode(Iri::Prefixed(iri.to_string()))
    }
}

impl VarOrNodeOrLiteral {
    pub fn var(name: &str) -> Self {
        Self::Variable(name.to_string())
    }

    pub fn full(iri: &str) -> Self {
        Self::Node(Node::NamedNode(Iri::Full(iri.to_string())))
    }

    pub fn prefixed(iri: &str) -> Self {
        Self::Node(Node::NamedNode(Iri::Prefixed(iri.to_string())))
    }
}

/// A single `subject predicate object` pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriplePattern {
    pub object: VarOrNodeOrLiteral,
    pub predicate: VarOrNamedNode,
    pub subject: VarOrNode,
}

impl TriplePattern {
    pub fn new(subject: VarOrNode, predicate: VarOrNamedNode, object: VarOrNodeOrLiteral) -> Self {
        Self {
            object,
            predicate,
            subject,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WhereClause {
    /// Basic graph pattern: every triple must match.
    Bgp { patterns: Vec<TriplePattern> },
}

/// A `SELECT` query.
///
/// Built fluently:
///
/// ```
/// use axone_mcp::sparql::{SelectQuery, TriplePattern, VarOrNode, VarOrNamedNode, VarOrNodeOrLiteral};
///
/// let query = SelectQuery::new()
///     .prefix("ex", "https://example.org/")
///     .select("o")
///     .limit(10)
///     .pattern(TriplePattern::new(
///         VarOrNode::var("s"),
///         VarOrNamedNode::prefixed("ex:p"),
///         VarOrNodeOrLiteral::var("o"),
///     ));
/// assert_eq!(query.limit, Some(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    pub prefixes: Vec<Prefix>,
    pub select: Vec<SelectItem>,
    #[serde(rename = "where")]
    pub where_clause: WhereClause,
}

impl Default for SelectQuery {
    fn default() -> Self {
        Self {
            limit: None,
            prefixes: Vec::new(),
            select: Vec::new(),
            where_clause: WhereClause::Bgp {
                patterns: Vec::new(),
            },
        }
    }
}

impl SelectQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a namespace prefix.
    pub fn prefix(mut self, prefix: &str, namespace: &str) -> Self {
        self.prefixes.push(Prefix {
            namespace: namespace.to_string(),
            prefix: prefix.to_string(),
        });
        self
    }

    /// Adds a variable to the select clause.
    pub fn select(mut self, variable: &str) -> Self {
        self.select.push(SelectItem::Variable(variable.to_string()));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Appends a triple to the basic graph pattern.
    pub fn pattern(mut self, pattern: TriplePattern) -> Self {
        let WhereClause::Bgp { patterns } = &mut self.where_clause;
        patterns.push(pattern);
        self
    }
}

/// Namespace of the governance text credential vocabulary.
pub fn governance_namespace() -> String {
    format!("{}/schema/credential/governance/text/", W3ID_PREFIX)
}

/// Builds the query resolving the governance code attached to `resource`.
///
/// Matches a `GovernanceTextCredential` whose subject is the resource and
/// follows its claim to the governance it derives from:
///
/// ```text
/// ?credId body#subject  <resource>
/// ?credId body#type     gov:GovernanceTextCredential
/// ?credId body#claim    ?claim
/// ?claim  gov:isGovernedBy   ?gov
/// ?gov    gov:fromGovernance ?code
/// ```
pub fn governance_lookup_query(resource: &str) -> SelectQuery {
    SelectQuery::new()
        .limit(1)
        .prefix("gov", &governance_namespace())
        .select(CODE_VARIABLE)
        .pattern(TriplePattern::new(
            VarOrNode::var("credId"),
            VarOrNamedNode::full(VC_BODY_SUBJECT),
            VarOrNodeOrLiteral::full(resource),
        ))
        .pattern(TriplePattern::new(
            VarOrNode::var("credId"),
            VarOrNamedNode::full(VC_BODY_TYPE),
            VarOrNodeOrLiteral::prefixed("gov:GovernanceTextCredential"),
        ))
        .pattern(TriplePattern::new(
            VarOrNode::var("credId"),
            VarOrNamedNode::full(VC_BODY_CLAIM),
            VarOrNodeOrLiteral::var("claim"),
        ))
        .pattern(TriplePattern::new(
            VarOrNode::var("claim"),
            VarOrNamedNode::prefixed("gov:isGovernedBy"),
            VarOrNodeOrLiteral::var("gov"),
        ))
        .pattern(TriplePattern::new(
            VarOrNode::var("gov"),
            VarOrNamedNode::prefixed("gov:fromGovernance"),
            VarOrNodeOrLiteral::var(CODE_VARIABLE),
        ))
}

/// Extracts a contract address from a URI such as `contract:law-stone:<addr>`.
///
/// The address is the text after the last colon; a string without colon is
/// taken as the address itself.
pub fn contract_address_from_uri(uri: &str) -> &str {
    match uri.rfind(':') {
        Some(i) => &uri[i + 1..],
        None => uri,
    }
}
