//! Smart contract state queries over the node's gRPC endpoint.
//!
//! - [`ContractQuerier`] - the seam every contract client goes through
//! - [`GrpcQuerier`] - implementation over a tonic [`Channel`]

use std::time::Duration;

use async_trait::async_trait;
use http::uri::PathAndQuery;
use tonic::client::Grpc;
use tonic::codec::ProstCodec;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};
use tonic::Status;

use crate::config::{GrpcConfig, TlsMode};

/// Fully qualified gRPC method of the wasm module's smart query.
pub const SMART_CONTRACT_STATE_PATH: &str = "/cosmwasm.wasm.v1.Query/SmartContractState";

/// `cosmwasm.wasm.v1.QuerySmartContractStateRequest`
#[derive(Clone, PartialEq, prost::Message)]
pub struct QuerySmartContractStateRequest {
    #[prost(string, tag = "1")]
    pub address: String,
    #[prost(bytes = "vec", tag = "2")]
    pub query_data: Vec<u8>,
}

/// `cosmwasm.wasm.v1.QuerySmartContractStateResponse`
#[derive(Clone, PartialEq, prost::Message)]
pub struct QuerySmartContractStateResponse {
    #[prost(bytes = "vec", tag = "1")]
    pub data: Vec<u8>,
}

/// Sends raw smart queries to deployed contracts.
///
/// Implementations are pass-through: the status returned by the channel
/// (network failure, contract error, deadline exceeded) is surfaced as-is
/// and nothing is retried.
#[async_trait]
pub trait ContractQuerier: Send + Sync {
    /// Queries the state of the contract at `address` with a JSON-encoded
    /// query message and returns the raw JSON response bytes.
    async fn query_smart(&self, address: &str, query_data: Vec<u8>) -> Result<Vec<u8>, Status>;
}

/// [`ContractQuerier`] backed by a tonic channel to an axone node.
///
/// The channel is a cheap handle; clones share the same connection and can
/// be used from concurrent requests.
#[derive(Clone)]
pub struct GrpcQuerier {
    channel: Channel,
}

impl GrpcQuerier {
    /// Wraps an already established channel.
    pub fn new(channel: Channel) -> Self {
        Self { channel }
    }

    /// Connects to the node described by `config`.
    ///
    /// Connection is eager so that a wrong endpoint is reported at startup
    /// rather than on the first tool call.
    pub async fn connect(config: &GrpcConfig) -> Result<Self, tonic::transport::Error> {
        let endpoint = build_endpoint(config)?;
        tracing::info!(endpoint = %endpoint.uri(), "Connecting to node gRPC endpoint");

        let channel = endpoint.connect().await?;
        tracing::info!("Connected to node");

        Ok(Self::new(channel))
    }
}

#[async_trait]
impl ContractQuerier for GrpcQuerier {
    async fn query_smart(&self, address: &str, query_data: Vec<u8>) -> Result<Vec<u8>, Status> {
        let mut grpc = Grpc::new(self.channel.clone());
        grpc.ready()
            .await
            .map_err(|e| Status::unknown(format!("Service was not ready: {}", e)))?;

        let request = QuerySmartContractStateRequest {
            address: address.to_string(),
            query_data,
        };
        let codec: ProstCodec<QuerySmartContractStateRequest, QuerySmartContractStateResponse> =
            ProstCodec::default();

        let response = grpc
            .unary(
                tonic::Request::new(request),
                PathAndQuery::from_static(SMART_CONTRACT_STATE_PATH),
                codec,
            )
            .await?;

        Ok(response.into_inner().data)
    }
}

/// Builds the tonic endpoint: scheme, TLS and timeouts.
fn build_endpoint(config: &GrpcConfig) -> Result<Endpoint, tonic::transport::Error> {
    let endpoint = Endpoint::from_shared(endpoint_uri(&config.endpoint, config.tls))?
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .tcp_keepalive(Some(Duration::from_secs(30)));

    match config.tls {
        TlsMode::Enabled => endpoint.tls_config(ClientTlsConfig::new().with_webpki_roots()),
        TlsMode::Disabled => Ok(endpoint),
    }
}

/// Node endpoints are configured as `host:port`; an explicit scheme wins.
fn endpoint_uri(endpoint: &str, tls: TlsMode) -> String {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        return endpoint.to_string();
    }

    match tls {
        TlsMode::Enabled => format!("https://{}", endpoint),
        TlsMode::Disabled => format!("http://{}", endpoint),
    }
}
