//! Database operations for the `submissions` table.

use chrono::{DateTime, Utc};
use pasture_core::{
    NewSubmission, NewVendor, Submission, SubmissionStatus, DEFAULT_SERVICE_RADIUS_MILES,
};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::vendors::insert_vendor;

const SUBMISSION_COLUMNS: &str = "id, business_name, contact_name, phone, email, address, \
     city, state, state_code, latitude, longitude, services, species, service_radius_miles, \
     description, website, emergency_service, business_hours, submitter_ip, \
     submission_status, submitted_at";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SubmissionRow {
    pub id: Uuid,
    pub business_name: String,
    pub contact_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub state_code: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub services: Vec<String>,
    pub species: Vec<String>,
    pub service_radius_miles: i32,
    pub description: String,
    pub website: Option<String>,
    pub emergency_service: bool,
    pub business_hours: String,
    pub submitter_ip: String,
    pub submission_status: String,
    pub submitted_at: DateTime<Utc>,
}

impl TryFrom<SubmissionRow> for Submission {
    type Error = pasture_core::CoreError;

    fn try_from(row: SubmissionRow) -> Result<Self, Self::Error> {
        Ok(Submission {
            id: row.id.to_string(),
            business_name: row.business_name,
            contact_name: row.contact_name,
            phone: row.phone,
            email: row.email,
            address: row.address,
            city: row.city,
            state: row.state,
            state_code: row.state_code,
            latitude: row.latitude,
            longitude: row.longitude,
            services: row.services,
            species: row.species,
            service_radius_miles: u32::try_from(row.service_radius_miles)
                .unwrap_or(DEFAULT_SERVICE_RADIUS_MILES),
            description: row.description,
            website: row.website,
            emergency_service: row.emergency_service,
            business_hours: row.business_hours,
            submitter_ip: row.submitter_ip,
            submission_status: row.submission_status.parse()?,
            submitted_at: row.submitted_at,
        })
    }
}

/// Store a new `Pending` submission and return its id.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the insert fails.
pub async fn insert_submission(
    pool: &PgPool,
    submission: &NewSubmission,
) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO submissions \
             (business_name, contact_name, phone, email, address, city, state, state_code, \
              latitude, longitude, services, species, service_radius_miles, description, \
              website, emergency_service, business_hours, submitter_ip) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, \
                 $16, $17, $18) \
         RETURNING id",
    )
    .bind(&submission.business_name)
    .bind(&submission.contact_name)
    .bind(&submission.phone)
    .bind(&submission.email)
    .bind(&submission.address)
    .bind(&submission.city)
    .bind(&submission.state)
    .bind(&submission.state_code)
    .bind(submission.latitude)
    .bind(submission.longitude)
    .bind(&submission.services)
    .bind(&submission.species)
    .bind(i32::try_from(submission.service_radius_miles).unwrap_or(i32::MAX))
    .bind(&submission.description)
    .bind(&submission.website)
    .bind(submission.emergency_service)
    .bind(&submission.business_hours)
    .bind(&submission.submitter_ip)
    .fetch_one(pool)
    .await
}

/// Fetch one submission by id, `None` if it does not exist.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn get_submission(pool: &PgPool, id: Uuid) -> Result<Option<SubmissionRow>, sqlx::Error> {
    sqlx::query_as::<_, SubmissionRow>(&format!(
        "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Pending submissions, oldest first.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_pending_submissions(pool: &PgPool) -> Result<Vec<SubmissionRow>, sqlx::Error> {
    sqlx::query_as::<_, SubmissionRow>(&format!(
        "SELECT {SUBMISSION_COLUMNS} \
         FROM submissions \
         WHERE submission_status = 'Pending' \
         ORDER BY submitted_at ASC, id ASC"
    ))
    .fetch_all(pool)
    .await
}

/// Decide a `Pending` submission. Returns the number of rows updated: 0
/// when the id is unknown or the submission was already decided.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the update fails.
pub async fn update_submission_status<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    status: SubmissionStatus,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE submissions \
         SET submission_status = $2, reviewed_at = NOW() \
         WHERE id = $1 AND submission_status = 'Pending'",
    )
    .bind(id)
    .bind(status.as_str())
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

/// Approve a `Pending` submission and insert its vendor in one transaction.
///
/// The conditional update takes the row lock first, so a concurrent
/// approval waits and then finds the submission no longer `Pending`.
/// Returns `None`, with nothing written, when the submission is unknown or
/// already decided.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if any statement fails; the transaction is then
/// rolled back.
pub async fn approve_submission(
    pool: &PgPool,
    id: Uuid,
    vendor: &NewVendor,
) -> Result<Option<Uuid>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let claimed = update_submission_status(&mut *tx, id, SubmissionStatus::Approved).await?;
    if claimed == 0 {
        tx.rollback().await?;
        return Ok(None);
    }

    let vendor_id = insert_vendor(&mut *tx, vendor).await?;
    tx.commit().await?;
    Ok(Some(vendor_id))
}
