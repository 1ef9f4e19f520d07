//! Read-only access to CosmWasm contracts of an axone node.
//!
//! ## Modules
//!
//! - `gateway`: raw smart queries over gRPC ([`ContractQuerier`])
//! - `msg`: query messages and responses of the dataverse contracts
//! - `client`: JSON encoding and decoding around the gateway ([`ContractClient`])

mod client;
mod gateway;
#[cfg(test)]
pub(crate) mod mock;
mod msg;

pub use client::{ContractClient, GatewayError};
pub use gateway::{
    ContractQuerier, GrpcQuerier, QuerySmartContractStateRequest,
    QuerySmartContractStateResponse, SMART_CONTRACT_STATE_PATH,
};
pub use msg::{DataverseResponse, QueryMsg};
