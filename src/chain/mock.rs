//! In-memory [`ContractQuerier`] for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tonic::Status;

use super::gateway::ContractQuerier;

type Reply = Result<Vec<u8>, Status>;

/// Answers smart queries from a table keyed by `(address, query JSON)` and
/// records every call it receives.
///
/// Unknown queries fail with `NOT_FOUND`, which makes an unexpected payload
/// show up as a failing assertion rather than a hang.
#[derive(Default)]
pub struct MockQuerier {
    replies: HashMap<(String, String), Reply>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockQuerier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, address: &str, query: &str, response: &str) -> Self {
        self.replies.insert(
            (address.to_string(), query.to_string()),
            Ok(response.as_bytes().to_vec()),
        );
        self
    }

    pub fn fail(mut self, address: &str, query: &str, status: Status) -> Self {
        self.replies
            .insert((address.to_string(), query.to_string()), Err(status));
        self
    }

    /// Addresses queried so far, in call order.
    pub fn called_addresses(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(address, _)| address.clone())
            .collect()
    }
}

#[async_trait]
impl ContractQuerier for MockQuerier {
    async fn query_smart(&self, address: &str, query_data: Vec<u8>) -> Result<Vec<u8>, Status> {
        let query = String::from_utf8(query_data).expect("query data is JSON text");
        self.calls
            .lock()
            .unwrap()
            .push((address.to_string(), query.clone()));

        match self.replies.get(&(address.to_string(), query.clone())) {
            Some(Ok(data)) => Ok(data.clone()),
            Some(Err(status)) => Err(status.clone()),
            None => Err(Status::not_found(format!(
                "unexpected query to {}: {}",
                address, query
            ))),
        }
    }
}
