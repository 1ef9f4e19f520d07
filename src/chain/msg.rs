//! Query messages and responses of the dataverse contracts.

use serde::{Deserialize, Serialize};

use crate::sparql::SelectQuery;

/// Smart query sent to a contract.
///
/// Serialized externally tagged, so each variant lands under a single
/// top-level key: `{"dataverse":{}}`, `{"select":{"query":…}}`,
/// `{"program_code":{}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    /// Dataverse contract: general information.
    Dataverse {},
    /// Cognitarium contract: evaluate a select query.
    Select { query: SelectQuery },
    /// Law-stone contract: base64 encoded program source.
    ProgramCode {},
}

impl QueryMsg {
    /// Variant name, used in error messages and logs.
    pub fn name(&self) -> &'static str {
        match self {
            QueryMsg::Dataverse {} => "dataverse",
            QueryMsg::Select { .. } => "select",
            QueryMsg::ProgramCode {} => "program_code",
        }
    }
}

/// Response to [`QueryMsg::Dataverse`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataverseResponse {
    #[serde(default)]
    pub name: String,
    /// Address of the cognitarium holding the dataverse graph.
    #[serde(default)]
    pub triplestore_address: String,
}
