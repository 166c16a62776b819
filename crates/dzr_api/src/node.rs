use model::query::NodeQuery;

use crate::{client::DzrApiClient, ApiError};

/// Label of the graph node closest to the queried position. The server
/// answers with the bare node index.
pub async fn get_node_at(client: &DzrApiClient, query: &NodeQuery) -> Result<String, ApiError> {
    let label = client.get_text("node_at", &query.query_pairs()).await?;
    let label = label.trim();
    if label.is_empty() {
        return Err(ApiError::NotFound {
            url: client.url("node_at"),
            reason: format!("no node near {}", query.position),
        });
    }
    Ok(label.to_owned())
}
