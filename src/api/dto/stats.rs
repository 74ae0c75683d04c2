//! DTOs for the statistics endpoint.

use serde::Serialize;

use crate::domain::entities::StatsSnapshot;

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub ok: bool,
    pub stats: StatsSnapshot,
}
