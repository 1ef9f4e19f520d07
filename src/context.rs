//! Application context providing dependency injection root.

use std::sync::Arc;

use crate::chain::{ContractClient, ContractQuerier, GrpcQuerier};
use crate::config::Config;
use crate::di::FromRef;

/// Root application context for dependency injection.
///
/// Holds the shared dependencies. Services and clients implement
/// `FromRef<Context>` and are resolved from it at tool execution time.
#[derive(Clone)]
pub struct Context {
    /// Smart query access to the chain node.
    pub querier: Arc<dyn ContractQuerier>,
    /// Application configuration.
    pub config: Arc<Config>,
}

impl Context {
    /// Creates a new context with the given dependencies.
    pub fn new(querier: Arc<dyn ContractQuerier>, config: Config) -> Self {
        Self {
            querier,
            config: Arc::new(config),
        }
    }

    /// Connects to the node configured in `config.grpc` and builds the context.
    pub async fn connect(config: Config) -> Result<Self, tonic::transport::Error> {
        let querier = GrpcQuerier::connect(&config.grpc).await?;
        Ok(Self::new(Arc::new(querier), config))
    }
}

impl FromRef<Context> for ContractClient {
    fn from_ref(ctx: &Context) -> Self {
        ContractClient::new(ctx.querier.clone())
    }
}
