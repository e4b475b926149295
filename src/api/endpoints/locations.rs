//! Outreach location listing — the picker data for outreach bookings.

use axum::extract::State;
use axum::Extension;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};
use crate::db::repository::list_active_outreach_locations;
use crate::models::OutreachLocation;

#[derive(Serialize)]
pub struct LocationsResponse {
    pub locations: Vec<OutreachLocation>,
}

/// `GET /api/locations/outreach` — active outreach sites, by county.
pub async fn list_outreach(
    State(ctx): State<ApiContext>,
    Extension(_user): Extension<UserContext>,
) -> Result<Json<LocationsResponse>, ApiError> {
    let conn = ctx.state.open_db()?;
    let locations = list_active_outreach_locations(&conn)?;

    Ok(Json(LocationsResponse { locations }))
}
