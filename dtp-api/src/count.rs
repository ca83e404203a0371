//! Count operations against the platform's `count_nodes` endpoint.

use crate::client::DtpClient;
use crate::error::ApiResult;
use crate::query::{CountQuery, Direction};
use async_trait::async_trait;
use errors::RequestError;
use serde_json::Value;
use tracing::debug;

/// Mapping key of the count endpoint in `API_URLS`.
pub const COUNT_NODES_OPERATION: &str = "count_nodes";

/// Count queries over the platform graph.
///
/// Implementors provide [`CountApi::count_related`]; the named operations
/// are fixed query shapes on top of it.
#[async_trait]
pub trait CountApi: Send + Sync {
    /// Count nodes reached from `query.node_iri` through one relation and
    /// belonging to the target class.
    async fn count_related(&self, query: &CountQuery) -> ApiResult<u64>;

    /// Task nodes attached to an activity.
    async fn activity_count_connected_task_nodes(&self, activity_node_iri: &str) -> ApiResult<u64> {
        let query = CountQuery::new(activity_node_iri, "hasTask", "task", Direction::Outgoing);
        self.count_related(&query).await
    }

    /// As-built elements pointing at an as-designed node.
    async fn asdesigned_count_connected_asbuilt_nodes(&self, node_iri: &str) -> ApiResult<u64> {
        let query = CountQuery::new(
            node_iri,
            "intentStatusRelation",
            "classElement",
            Direction::Incoming
        )
        .with_alias("asbuilt")
        .with_filter("isAsDesigned", false);
        self.count_related(&query).await
    }

    /// Geometric defects attached to an as-built node.
    async fn asbuilt_count_connected_geomdefect_nodes(
        &self,
        asbuilt_node_iri: &str
    ) -> ApiResult<u64> {
        let query = CountQuery::new(
            asbuilt_node_iri,
            "hasGeometricDefect",
            "GeometricDefect",
            Direction::Outgoing
        )
        .with_alias("defect");
        self.count_related(&query).await
    }
}

#[async_trait]
impl CountApi for DtpClient {
    async fn count_related(&self, query: &CountQuery) -> ApiResult<u64> {
        let url = self.settings().api_url(COUNT_NODES_OPERATION, None)?;
        let payload = query.build(self.settings())?;

        debug!(
            node = %query.node_iri,
            relation = %query.relation_term,
            class = %query.target_class_term,
            "Counting related nodes"
        );

        let output = self.post_general_request(&url, &payload).await?;
        Ok(parse_total_items(&url, &output)?)
    }
}

/// Read `total_items` as a non-negative integer; numeric strings are
/// accepted.
pub fn parse_total_items(url: &str, output: &Value) -> Result<u64, RequestError> {
    let malformed = |reason: String| RequestError::MalformedResponse {
        url: url.to_string(),
        reason
    };

    match output.get("total_items") {
        Some(Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| malformed(format!("total_items is not a count: {n}"))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| malformed(format!("total_items is not a count: {s}"))),
        Some(other) => Err(malformed(format!("total_items has unexpected type: {other}"))),
        None => Err(malformed("missing total_items".to_string()))
    }
}
