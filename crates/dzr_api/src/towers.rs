use serde::Deserialize;

use model::{query::AreaQuery, tower::Tower};

use crate::{client::DzrApiClient, ApiError};

/// A tower as the server lists it. Other attributes (radio type, network)
/// are ignored; the request already filtered by provider.
#[derive(Debug, Deserialize)]
pub struct TowerRecord {
    pub lat: f64,
    pub lon: f64,
    /// Range in kilometers.
    pub range: f64,
}

impl From<TowerRecord> for Tower {
    fn from(record: TowerRecord) -> Self {
        Tower {
            lat: record.lat,
            lon: record.lon,
            range_km: record.range,
        }
    }
}

pub async fn get_towers(client: &DzrApiClient, query: &AreaQuery) -> Result<Vec<Tower>, ApiError> {
    let records: Vec<TowerRecord> = client.get_json("towers", &query.query_pairs()).await?;
    log::debug!("received {} towers of {}", records.len(), query.provider);
    Ok(records.into_iter().map(Tower::from).collect())
}
