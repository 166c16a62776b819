use geojson::{FeatureCollection, Geometry};

use model::query::AreaQuery;

use crate::{client::DzrApiClient, ApiError};

/// Road segments inside the area whose coverage by the provider is poor.
pub async fn get_low_coverage(
    client: &DzrApiClient,
    query: &AreaQuery,
) -> Result<Vec<Geometry>, ApiError> {
    let collection: FeatureCollection = client
        .get_json("low_coverage", &query.query_pairs())
        .await?;
    Ok(collection
        .features
        .into_iter()
        .filter_map(|feature| feature.geometry)
        .collect())
}
