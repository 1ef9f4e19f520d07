//! Typed contract client on top of a [`ContractQuerier`].

use std::sync::Arc;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tonic::Status;

use super::gateway::ContractQuerier;
use super::msg::{DataverseResponse, QueryMsg};
use crate::sparql::{SelectQuery, SelectResponse};

/// Failure of a single contract query.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("encode {query} query ({address}): {source}")]
    Encode {
        query: &'static str,
        address: String,
        source: serde_json::Error,
    },

    /// Status returned by the node, message passed through verbatim.
    #[error("{}", .0.message())]
    Rpc(#[from] Status),

    #[error("decode {query} response ({address}): {source}")]
    Decode {
        query: &'static str,
        address: String,
        source: serde_json::Error,
    },
}

/// Sends JSON query messages to contracts and decodes their responses.
#[derive(Clone)]
pub struct ContractClient {
    querier: Arc<dyn ContractQuerier>,
}

impl ContractClient {
    pub fn new(querier: Arc<dyn ContractQuerier>) -> Self {
        Self { querier }
    }

    /// Queries the contract at `address` and decodes the response as `T`.
    pub async fn query<T: DeserializeOwned>(
        &self,
        address: &str,
        msg: &QueryMsg,
    ) -> Result<T, GatewayError> {
        let query = msg.name();
        let query_data = serde_json::to_vec(msg).map_err(|source| GatewayError::Encode {
            query,
            address: address.to_string(),
            source,
        })?;

        tracing::debug!(address, query, "Querying contract state");
        let data = self.querier.query_smart(address, query_data).await?;

        serde_json::from_slice(&data).map_err(|source| GatewayError::Decode {
            query,
            address: address.to_string(),
            source,
        })
    }

    /// Dataverse contract information.
    pub async fn dataverse(&self, address: &str) -> Result<DataverseResponse, GatewayError> {
        self.query(address, &QueryMsg::Dataverse {}).await
    }

    /// Evaluates `query` on the cognitarium at `address`.
    pub async fn select(
        &self,
        address: &str,
        query: SelectQuery,
    ) -> Result<SelectResponse, GatewayError> {
        self.query(address, &QueryMsg::Select { query }).await
    }

    /// Base64 encoded program stored by the law-stone at `address`.
    pub async fn program_code(&self, address: &str) -> Result<String, GatewayError> {
        self.query(address, &QueryMsg::ProgramCode {}).await
    }
}
