//! Read and availability queries the dispatch engine needs from the system
//! of record.

use sqlx::PgPool;

use shared::types::{Vehicle, Zone};
use shared::AppResult;

#[derive(Clone)]
pub struct DispatchRepository {
    pool: PgPool,
}

impl DispatchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Zones still holding people, most urgent first. Equal urgency keeps
    /// arrival order.
    pub async fn zones_needing_rescue(&self) -> AppResult<Vec<Zone>> {
        let rows = sqlx::query(
            "SELECT * FROM evacuation_zones \
             WHERE evacuated < number_of_people \
             ORDER BY urgency_level DESC, created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Zone::from_row).collect()
    }

    pub async fn all_zones(&self) -> AppResult<Vec<Zone>> {
        let rows = sqlx::query("SELECT * FROM evacuation_zones ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Zone::from_row).collect()
    }

    pub async fn available_vehicles(&self) -> AppResult<Vec<Vehicle>> {
        let rows = sqlx::query("SELECT * FROM vehicles WHERE is_available ORDER BY vehicle_id")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Vehicle::from_row).collect()
    }

    pub async fn zone_by_id(&self, zone_id: &str) -> AppResult<Option<Zone>> {
        let row = sqlx::query("SELECT * FROM evacuation_zones WHERE zone_id = $1")
            .bind(zone_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Zone::from_row).transpose()
    }

    pub async fn vehicle_by_id(&self, vehicle_id: &str) -> AppResult<Option<Vehicle>> {
        let row = sqlx::query("SELECT * FROM vehicles WHERE vehicle_id = $1")
            .bind(vehicle_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Vehicle::from_row).transpose()
    }

    /// Persist the planner's outcome: every consumed vehicle leaves the
    /// available pool.
    pub async fn mark_vehicles_unavailable(&self, vehicle_ids: &[String]) -> AppResult<()> {
        if vehicle_ids.is_empty() {
            return Ok(());
        }
        sqlx::query("UPDATE vehicles SET is_available = FALSE WHERE vehicle_id = ANY($1)")
            .bind(vehicle_ids)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
