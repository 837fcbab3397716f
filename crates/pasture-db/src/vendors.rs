//! Database operations for the `vendors` table.

use chrono::{DateTime, Utc};
use pasture_core::{NewVendor, Vendor, VendorStatus, DEFAULT_SERVICE_RADIUS_MILES};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::contains_pattern;

const VENDOR_COLUMNS: &str = "id, name, phone, email, website, address, city, state, \
     state_code, latitude, longitude, service_types, species, service_radius_miles, \
     description, status, emergency_service, insurance_certified, business_hours, \
     featured_image, created_at, updated_at";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VendorRow {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub website: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub state_code: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub service_types: Vec<String>,
    pub species: Vec<String>,
    pub service_radius_miles: i32,
    pub description: String,
    pub status: String,
    pub emergency_service: bool,
    pub insurance_certified: bool,
    pub business_hours: String,
    pub featured_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<VendorRow> for Vendor {
    type Error = pasture_core::CoreError;

    fn try_from(row: VendorRow) -> Result<Self, Self::Error> {
        Ok(Vendor {
            id: row.id.to_string(),
            name: row.name,
            phone: row.phone,
            email: row.email,
            website: row.website,
            address: row.address,
            city: row.city,
            state: row.state,
            state_code: row.state_code,
            latitude: row.latitude,
            longitude: row.longitude,
            service_types: row.service_types,
            species: row.species,
            service_radius_miles: u32::try_from(row.service_radius_miles)
                .unwrap_or(DEFAULT_SERVICE_RADIUS_MILES),
            description: row.description,
            status: row.status.parse()?,
            emergency_service: row.emergency_service,
            insurance_certified: row.insurance_certified,
            business_hours: row.business_hours,
            featured_image: row.featured_image,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// List vendors ordered by `name ASC`.
///
/// `status` restricts to one lifecycle state. `service_terms`, when non-empty,
/// keeps vendors where any service label contains any term (case-insensitive).
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_vendors(
    pool: &PgPool,
    status: Option<VendorStatus>,
    service_terms: &[String],
) -> Result<Vec<VendorRow>, sqlx::Error> {
    let patterns: Vec<String> = service_terms
        .iter()
        .filter(|t| !t.trim().is_empty())
        .map(|t| contains_pattern(t))
        .collect();

    sqlx::query_as::<_, VendorRow>(&format!(
        "SELECT {VENDOR_COLUMNS} \
         FROM vendors \
         WHERE ($1::text IS NULL OR status = $1) \
           AND (cardinality($2::text[]) = 0 \
                OR EXISTS (\
                    SELECT 1 FROM unnest(service_types) AS label \
                    WHERE label ILIKE ANY($2::text[])\
                )) \
         ORDER BY name ASC, id ASC"
    ))
    .bind(status.map(VendorStatus::as_str))
    .bind(&patterns)
    .fetch_all(pool)
    .await
}

/// Fetch one vendor by id regardless of status.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn get_vendor(pool: &PgPool, id: Uuid) -> Result<Option<VendorRow>, sqlx::Error> {
    sqlx::query_as::<_, VendorRow>(&format!(
        "SELECT {VENDOR_COLUMNS} FROM vendors WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Insert a vendor and return its generated id.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the insert fails.
pub async fn insert_vendor<'e>(
    executor: impl PgExecutor<'e>,
    vendor: &NewVendor,
) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO vendors \
             (name, phone, email, website, address, city, state, state_code, \
              latitude, longitude, service_types, species, service_radius_miles, \
              description, status, emergency_service, insurance_certified, \
              business_hours, featured_image) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, \
                 $16, $17, $18, $19) \
         RETURNING id",
    )
    .bind(&vendor.name)
    .bind(&vendor.phone)
    .bind(&vendor.email)
    .bind(&vendor.website)
    .bind(&vendor.address)
    .bind(&vendor.city)
    .bind(&vendor.state)
    .bind(&vendor.state_code)
    .bind(vendor.latitude)
    .bind(vendor.longitude)
    .bind(&vendor.service_types)
    .bind(&vendor.species)
    .bind(i32::try_from(vendor.service_radius_miles).unwrap_or(i32::MAX))
    .bind(&vendor.description)
    .bind(vendor.status.as_str())
    .bind(vendor.emergency_service)
    .bind(vendor.insurance_certified)
    .bind(&vendor.business_hours)
    .bind(&vendor.featured_image)
    .fetch_one(executor)
    .await
}

/// Set a vendor's status. Returns the number of rows updated (0 or 1).
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the update fails.
pub async fn update_vendor_status(
    pool: &PgPool,
    id: Uuid,
    status: VendorStatus,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE vendors SET status = $2, updated_at = NOW() WHERE id = $1",
    )
    .bind(id)
    .bind(status.as_str())
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
