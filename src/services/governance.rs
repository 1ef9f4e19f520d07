//! Governance code resolution for dataverse resources.
//!
//! Resolution chains three contract queries, each consuming the previous
//! result:
//!
//! 1. dataverse → address of its cognitarium (triplestore)
//! 2. cognitarium → address of the law-stone governing the resource
//! 3. law-stone → base64 encoded program, decoded to text
//!
//! Any failing step ends the resolution. Nothing is retried and nothing is
//! cached.

use std::future::Future;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::chain::{ContractClient, DataverseResponse, GatewayError};
use crate::config::MultipleBindings;
use crate::context::Context;
use crate::di::FromRef;
use crate::sparql::{
    contract_address_from_uri, governance_lookup_query, BindingRow, Iri, Value, CODE_VARIABLE,
};

/// Why a governance code could not be resolved.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// A contract query failed; carries the upstream message unchanged.
    #[error(transparent)]
    Upstream(#[from] GatewayError),

    #[error("no triplestore address found")]
    EmptyGraphStoreAddress,

    #[error("no result")]
    NoResult,

    #[error("{0} results found where one was expected")]
    AmbiguousResult(usize),

    #[error("variable \"{0}\": variable not found")]
    VariableNotFound(String),

    #[error("expected uri, got {0}: variable type mismatch")]
    TypeMismatch(&'static str),

    #[error("code URI is not a full IRI: {0}")]
    UnexpandedIri(String),

    #[error("no contract address in code URI '{0}'")]
    EmptyContractAddress(String),

    #[error("failed to decode base64 code '{encoded}': {reason}")]
    Decode { encoded: String, reason: String },

    #[error("request cancelled")]
    Cancelled,
}

/// Resolves the governance program attached to a resource of a dataverse.
#[derive(Clone)]
pub struct GovernanceResolver {
    client: ContractClient,
    multiple_bindings: MultipleBindings,
}

impl FromRef<Context> for GovernanceResolver {
    fn from_ref(ctx: &Context) -> Self {
        Self::new(
            ContractClient::from_ref(ctx),
            ctx.config.resolver.multiple_bindings,
        )
    }
}

impl GovernanceResolver {
    pub fn new(client: ContractClient, multiple_bindings: MultipleBindings) -> Self {
        Self {
            client,
            multiple_bindings,
        }
    }

    /// Resolves the plain-text governance program of `resource` in `dataverse`.
    ///
    /// `cancel` is checked around every hop; once fired, the remaining hops
    /// are not sent and [`ResolveError::Cancelled`] is returned.
    pub async fn resolve(
        &self,
        dataverse: &str,
        resource: &str,
        cancel: &CancellationToken,
    ) -> Result<String, ResolveError> {
        let triplestore = until_cancelled(cancel, self.triplestore_address(dataverse)).await?;
        let law_stone =
            until_cancelled(cancel, self.governance_address(&triplestore, resource)).await?;
        let encoded = until_cancelled(cancel, self.program_code(&law_stone)).await?;

        let program = decode_program(&encoded)?;
        tracing::debug!(
            dataverse,
            resource,
            law_stone = %law_stone,
            bytes = program.len(),
            "Governance code resolved"
        );
        Ok(program)
    }

    /// Dataverse contract information.
    pub async fn dataverse(
        &self,
        dataverse: &str,
        cancel: &CancellationToken,
    ) -> Result<DataverseResponse, ResolveError> {
        let query = async {
            self.client
                .dataverse(dataverse)
                .await
                .map_err(ResolveError::from)
        };
        until_cancelled(cancel, query).await
    }

    /// Step 1: address of the dataverse's triplestore.
    async fn triplestore_address(&self, dataverse: &str) -> Result<String, ResolveError> {
        let info = self.client.dataverse(dataverse).await?;
        if info.triplestore_address.is_empty() {
            return Err(ResolveError::EmptyGraphStoreAddress);
        }
        Ok(info.triplestore_address)
    }

    /// Step 2: address of the law-stone governing `resource`.
    async fn governance_address(
        &self,
        triplestore: &str,
        resource: &str,
    ) -> Result<String, ResolveError> {
        let response = self
            .client
            .select(triplestore, governance_lookup_query(resource))
            .await?;

        let row = self.single_row(response.results.bindings)?;
        code_address(&row)
    }

    /// Step 3: encoded program source.
    async fn program_code(&self, law_stone: &str) -> Result<String, ResolveError> {
        Ok(self.client.program_code(law_stone).await?)
    }

    fn single_row(&self, mut bindings: Vec<BindingRow>) -> Result<BindingRow, ResolveError> {
        match (bindings.len(), self.multiple_bindings) {
            (0, _) => Err(ResolveError::NoResult),
            (1, _) | (_, MultipleBindings::First) => Ok(bindings.swap_remove(0)),
            (n, MultipleBindings::Reject) => Err(ResolveError::AmbiguousResult(n)),
        }
    }
}

/// Extracts the law-stone address bound to `?code` in `row`.
pub fn code_address(row: &BindingRow) -> Result<String, ResolveError> {
    let value = row
        .get(CODE_VARIABLE)
        .ok_or_else(|| ResolveError::VariableNotFound(CODE_VARIABLE.to_string()))?;

    match value {
        Value::Uri {
            value: Iri::Full(uri),
        } => match contract_address_from_uri(uri) {
            "" => Err(ResolveError::EmptyContractAddress(uri.clone())),
            address => Ok(address.to_string()),
        },
        Value::Uri {
            value: Iri::Prefixed(uri),
        } => Err(ResolveError::UnexpandedIri(uri.clone())),
        other => Err(ResolveError::TypeMismatch(other.kind())),
    }
}

/// Decodes a base64 (standard alphabet) program into UTF-8 text.
pub fn decode_program(encoded: &str) -> Result<String, ResolveError> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| ResolveError::Decode {
            encoded: encoded.to_string(),
            reason: e.to_string(),
        })?;

    String::from_utf8(bytes).map_err(|e| ResolveError::Decode {
        encoded: encoded.to_string(),
        reason: e.to_string(),
    })
}

/// Runs `step` unless `cancel` fires first.
async fn until_cancelled<T, F>(cancel: &CancellationToken, step: F) -> Result<T, ResolveError>
where
    F: Future<Output = Result<T, ResolveError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ResolveError::Cancelled),
        result = step => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tonic::Status;

    use crate::chain::mock::MockQuerier;
    use crate::chain::{ContractQuerier, QueryMsg};
    use async_trait::async_trait;

    const DATAVERSE: &str = "axone1xt4ahzz2x8hpkc0tk6ekte9x6crw4w6u0r67cyt3kz9syh24pd7scvlt2w";
    const TRIPLESTORE: &str = "axone1xa8wemfrzq03tkwqxnv9lun7rceec7wuhh8x3qjgxkaaj5fl50zsmj8u0n";
    const LAW_STONE: &str = "axone10tk8kmhhx49jahdyuxnn8d9luc9kxgc5m406k02s0y0ph59rdh7qstpynz";
    const RESOURCE: &str = "did:key:zQ3shTd79aJSfrNpMVpUVX1xrG9gabc6fmYJS4gFuwUnjKK3F";

    const DATAVERSE_QUERY: &str = r#"{"dataverse":{}}"#;
    const PROGRAM_CODE_QUERY: &str = r#"{"program_code":{}}"#;

    fn select_query(resource: &str) -> String {
        serde_json::to_string(&QueryMsg::Select {
            query: governance_lookup_query(resource),
        })
        .unwrap()
    }

    fn dataverse_info(triplestore: &str) -> String {
        format!(r#"{{"name":"dv","triplestore_address":"{}"}}"#, triplestore)
    }

    fn code_bindings(uris: &[&str]) -> String {
        let rows: Vec<_> = uris
            .iter()
            .map(|uri| serde_json::json!({"code": {"type": "uri", "value": {"full": uri}}}))
            .collect();
        serde_json::json!({"head": {"vars": ["code"]}, "results": {"bindings": rows}}).to_string()
    }

    fn encoded(text: &str) -> String {
        format!("\"{}\"", STANDARD.encode(text))
    }

    fn resolver(querier: &Arc<MockQuerier>, policy: MultipleBindings) -> GovernanceResolver {
        GovernanceResolver::new(ContractClient::new(querier.clone()), policy)
    }

    /// Querier answering all three hops successfully.
    fn happy_querier() -> MockQuerier {
        MockQuerier::new()
            .respond(DATAVERSE, DATAVERSE_QUERY, &dataverse_info(TRIPLESTORE))
            .respond(
                TRIPLESTORE,
                &select_query(RESOURCE),
                &code_bindings(&[&format!("contract:law-stone:{}", LAW_STONE)]),
            )
            .respond(LAW_STONE, PROGRAM_CODE_QUERY, &encoded("hello(world)."))
    }

    #[tokio::test]
    async fn test_resolve_returns_decoded_program() {
        let querier = Arc::new(happy_querier());
        let program = resolver(&querier, MultipleBindings::First)
            .resolve(DATAVERSE, RESOURCE, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(program, "hello(world).");
        assert_eq!(
            querier.called_addresses(),
            vec![DATAVERSE, TRIPLESTORE, LAW_STONE]
        );
    }

    #[tokio::test]
    async fn test_resolve_short_ids() {
        let querier = Arc::new(
            MockQuerier::new()
                .respond("A", DATAVERSE_QUERY, &dataverse_info("B"))
                .respond(
                    "B",
                    &select_query("did:key:Z"),
                    &code_bindings(&["contract:law-stone:C"]),
                )
                .respond("C", PROGRAM_CODE_QUERY, &encoded("hello(world).")),
        );

        let program = resolver(&querier, MultipleBindings::First)
            .resolve("A", "did:key:Z", &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(program, "hello(world).");
    }

    #[tokio::test]
    async fn test_empty_triplestore_stops_before_graph_query() {
        let querier = Arc::new(MockQuerier::new().respond(
            DATAVERSE,
            DATAVERSE_QUERY,
            r#"{"triplestore_address":""}"#,
        ));

        let err = resolver(&querier, MultipleBindings::First)
            .resolve(DATAVERSE, RESOURCE, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::EmptyGraphStoreAddress));
        assert_eq!(err.to_string(), "no triplestore address found");
        assert_eq!(querier.called_addresses(), vec![DATAVERSE]);
    }

    #[tokio::test]
    async fn test_upstream_error_is_verbatim() {
        let querier = Arc::new(MockQuerier::new().fail(
            DATAVERSE,
            DATAVERSE_QUERY,
            Status::internal("err1"),
        ));

        let err = resolver(&querier, MultipleBindings::First)
            .resolve(DATAVERSE, RESOURCE, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::Upstream(_)));
        assert_eq!(err.to_string(), "err1");
    }

    #[tokio::test]
    async fn test_program_code_error_is_verbatim() {
        let querier = Arc::new(
            MockQuerier::new()
                .respond(DATAVERSE, DATAVERSE_QUERY, &dataverse_info(TRIPLESTORE))
                .respond(
                    TRIPLESTORE,
                    &select_query(RESOURCE),
                    &code_bindings(&[&format!("contract:law-stone:{}", LAW_STONE)]),
                )
                .fail(LAW_STONE, PROGRAM_CODE_QUERY, Status::internal("err3")),
        );

        let err = resolver(&querier, MultipleBindings::First)
            .resolve(DATAVERSE, RESOURCE, &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "err3");
    }

    #[tokio::test]
    async fn test_zero_rows_is_no_result() {
        let querier = Arc::new(
            MockQuerier::new()
                .respond(DATAVERSE, DATAVERSE_QUERY, &dataverse_info(TRIPLESTORE))
                .respond(TRIPLESTORE, &select_query(RESOURCE), &code_bindings(&[]))
                .respond(LAW_STONE, PROGRAM_CODE_QUERY, &encoded("unused")),
        );

        let err = resolver(&querier, MultipleBindings::First)
            .resolve(DATAVERSE, RESOURCE, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::NoResult));
        assert_eq!(querier.called_addresses(), vec![DATAVERSE, TRIPLESTORE]);
    }

    #[tokio::test]
    async fn test_multiple_rows_follow_policy() {
        let querier = Arc::new(
            MockQuerier::new()
                .respond(DATAVERSE, DATAVERSE_QUERY, &dataverse_info(TRIPLESTORE))
                .respond(
                    TRIPLESTORE,
                    &select_query(RESOURCE),
                    &code_bindings(&["contract:law-stone:first", "contract:law-stone:second"]),
                )
                .respond("first", PROGRAM_CODE_QUERY, &encoded("first.")),
        );

        let program = resolver(&querier, MultipleBindings::First)
            .resolve(DATAVERSE, RESOURCE, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(program, "first.");

        let err = resolver(&querier, MultipleBindings::Reject)
            .resolve(DATAVERSE, RESOURCE, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::AmbiguousResult(2)));
    }

    #[test]
    fn test_code_address_missing_variable() {
        let mut row = BindingRow::new();
        row.insert(
            "other".to_string(),
            Value::Uri {
                value: Iri::Full("contract:law-stone:x".to_string()),
            },
        );

        let err = code_address(&row).unwrap_err();
        assert!(matches!(err, ResolveError::VariableNotFound(ref v) if v == "code"));
    }

    #[test]
    fn test_code_address_type_mismatch() {
        let mut row = BindingRow::new();
        row.insert(
            "code".to_string(),
            Value::Literal {
                value: "contract:law-stone:x".to_string(),
                lang: None,
                datatype: None,
            },
        );

        let err = code_address(&row).unwrap_err();
        assert!(matches!(err, ResolveError::TypeMismatch("literal")));
    }

    #[test]
    fn test_code_address_prefixed_iri() {
        let mut row = BindingRow::new();
        row.insert(
            "code".to_string(),
            Value::Uri {
                value: Iri::Prefixed("law:x".to_string()),
            },
        );

        assert!(matches!(
            code_address(&row),
            Err(ResolveError::UnexpandedIri(_))
        ));
    }

    #[test]
    fn test_code_address_without_colon() {
        let mut row = BindingRow::new();
        row.insert(
            "code".to_string(),
            Value::Uri {
                value: Iri::Full("axone1lawstone".to_string()),
            },
        );

        assert_eq!(code_address(&row).unwrap(), "axone1lawstone");
    }

    #[test]
    fn test_code_address_with_empty_suffix() {
        let mut row = BindingRow::new();
        row.insert(
            "code".to_string(),
            Value::Uri {
                value: Iri::Full("contract:law-stone:".to_string()),
            },
        );

        let err = code_address(&row).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::EmptyContractAddress(ref uri) if uri == "contract:law-stone:"
        ));
    }

    #[tokio::test]
    async fn test_empty_law_stone_address_is_never_queried() {
        let querier = Arc::new(
            MockQuerier::new()
                .respond(DATAVERSE, DATAVERSE_QUERY, &dataverse_info(TRIPLESTORE))
                .respond(
                    TRIPLESTORE,
                    &select_query(RESOURCE),
                    &code_bindings(&["contract:law-stone:"]),
                )
                .respond("", PROGRAM_CODE_QUERY, &encoded("unused")),
        );

        let err = resolver(&querier, MultipleBindings::First)
            .resolve(DATAVERSE, RESOURCE, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::EmptyContractAddress(_)));
        assert_eq!(querier.called_addresses(), vec![DATAVERSE, TRIPLESTORE]);
    }

    #[test]
    fn test_decode_program_error_mentions_input() {
        let err = decode_program("!!not_base64!!").unwrap_err();

        assert!(matches!(err, ResolveError::Decode { .. }));
        assert!(err
            .to_string()
            .starts_with("failed to decode base64 code '!!not_base64!!': "));
    }

    #[test]
    fn test_decode_program_rejects_invalid_utf8() {
        let err = decode_program(&STANDARD.encode([0xff, 0xfe])).unwrap_err();
        assert!(matches!(err, ResolveError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_bad_base64_from_chain() {
        let querier = Arc::new(
            MockQuerier::new()
                .respond(DATAVERSE, DATAVERSE_QUERY, &dataverse_info(TRIPLESTORE))
                .respond(
                    TRIPLESTORE,
                    &select_query(RESOURCE),
                    &code_bindings(&[&format!("contract:law-stone:{}", LAW_STONE)]),
                )
                .respond(LAW_STONE, PROGRAM_CODE_QUERY, r#""!!not_base64!!""#),
        );

        let err = resolver(&querier, MultipleBindings::First)
            .resolve(DATAVERSE, RESOURCE, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("'!!not_base64!!'"));
    }

    #[tokio::test]
    async fn test_cancelled_before_first_hop() {
        let querier = Arc::new(happy_querier());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = resolver(&querier, MultipleBindings::First)
            .resolve(DATAVERSE, RESOURCE, &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::Cancelled));
        assert!(querier.called_addresses().is_empty());
    }

    /// Cancels the token while answering a query, as a client going away
    /// mid-resolution would.
    struct CancelDuringQuery {
        inner: Arc<MockQuerier>,
        cancel: CancellationToken,
    }

    #[async_trait]
    impl ContractQuerier for CancelDuringQuery {
        async fn query_smart(&self, address: &str, query_data: Vec<u8>) -> Result<Vec<u8>, Status> {
            self.cancel.cancel();
            self.inner.query_smart(address, query_data).await
        }
    }

    #[tokio::test]
    async fn test_cancelled_during_first_hop() {
        let querier = Arc::new(happy_querier());
        let cancel = CancellationToken::new();
        let client = ContractClient::new(Arc::new(CancelDuringQuery {
            inner: querier.clone(),
            cancel: cancel.clone(),
        }));

        let err = GovernanceResolver::new(client, MultipleBindings::First)
            .resolve(DATAVERSE, RESOURCE, &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::Cancelled));
        assert_eq!(querier.called_addresses(), vec![DATAVERSE]);
    }

    #[tokio::test]
    async fn test_dataverse_info() {
        let querier = Arc::new(happy_querier());
        let info = resolver(&querier, MultipleBindings::First)
            .dataverse(DATAVERSE, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(info.triplestore_address, TRIPLESTORE);
    }
}
