use crate::features::coordinates::Coordinates;
use crate::features::geocoding::Address;
use serde::Serialize;
use std::path::PathBuf;

/// Everything one pipeline run produced for a photo.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocateResult {
    pub path: PathBuf,
    pub coordinates: Coordinates,
    pub address: Address,
    pub summary: String,
    pub map_link: String,
}
