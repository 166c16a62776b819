use model::{BoundingBox, LatLng};

use crate::{client::DzrApiClient, ApiError};

/// Extent of the loaded road graph, sent as `[[lat_min, lon_min], [lat_max, lon_max]]`.
pub async fn get_map_coords(client: &DzrApiClient) -> Result<BoundingBox, ApiError> {
    let corners: [[f64; 2]; 2] = client.get_json("map_coords", &Vec::new()).await?;
    let [[lat_a, lon_a], [lat_b, lon_b]] = corners;
    Ok(BoundingBox::from_corners(
        LatLng::new(lat_a, lon_a),
        LatLng::new(lat_b, lon_b),
    ))
}
