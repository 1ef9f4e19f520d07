//! SPARQL-like queries evaluated by the cognitarium (graph store) contract.
//!
//! This module only builds queries and reads their results; evaluation
//! happens on chain.

mod query;
mod results;

pub use query::{
    contract_address_from_uri, governance_lookup_query, governance_namespace, Iri, Node, Prefix,
    SelectItem, SelectQuery, TriplePattern, VarOrNamedNode, VarOrNode, VarOrNodeOrLiteral,
    WhereClause, CODE_VARIABLE, VC_BODY_CLAIM, VC_BODY_SUBJECT, VC_BODY_TYPE, W3ID_PREFIX,
};
pub use results::{BindingRow, Head, Results, SelectResponse, Value};
