//! Validation and normalization of prospective-vendor submissions.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::geo::GeoPoint;
use crate::repository::{BoxError, Geocoder, RepositoryError, VendorRepository};
use crate::vendor::NewSubmission;

pub const DEFAULT_SERVICE_RADIUS_MILES: u32 = 25;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("unable to geocode address: {address}")]
    GeocodeNotFound { address: String },
    #[error("geocoder failed: {0}")]
    Geocoder(#[source] BoxError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl IntakeError {
    /// The submitted field the error refers to, for client-side highlighting.
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            IntakeError::MissingField(field) => Some(field),
            IntakeError::GeocodeNotFound { .. } => Some("address"),
            IntakeError::Geocoder(_) | IntakeError::Repository(_) => None,
        }
    }

    /// Whether the submitter can fix this by editing the form.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            IntakeError::MissingField(_) | IntakeError::GeocodeNotFound { .. }
        )
    }
}

/// The raw form as posted by a prospective vendor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SubmissionForm {
    pub business_name: Option<String>,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub services: Vec<String>,
    pub species: Vec<String>,
    /// Accepts a number or a string such as `"30"` or `"30 miles"`.
    pub service_radius: Option<Value>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub state_code: Option<String>,
    pub website: Option<String>,
    pub emergency_service: bool,
    pub business_hours: Option<String>,
}

pub struct SubmissionIntake<'a> {
    repository: &'a dyn VendorRepository,
    geocoder: &'a dyn Geocoder,
}

impl<'a> SubmissionIntake<'a> {
    #[must_use]
    pub fn new(repository: &'a dyn VendorRepository, geocoder: &'a dyn Geocoder) -> Self {
        Self {
            repository,
            geocoder,
        }
    }

    /// Validate `form`, geocode it when it carries no usable coordinates, and
    /// store it as a `Pending` submission. Returns the new submission id.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::MissingField`] or
    /// [`IntakeError::GeocodeNotFound`] for problems the submitter must fix;
    /// nothing is stored in either case. Geocoder and repository failures are
    /// passed through.
    pub async fn submit(
        &self,
        form: SubmissionForm,
        submitter_ip: &str,
    ) -> Result<String, IntakeError> {
        let submission = match self.normalize(form, submitter_ip).await {
            Ok(submission) => submission,
            Err(err) => {
                if err.is_validation() {
                    tracing::warn!(error = %err, "submission rejected");
                }
                return Err(err);
            }
        };

        let id = self.repository.create_submission(&submission).await?;
        tracing::info!(
            submission_id = %id,
            business_name = %submission.business_name,
            "submission stored for review"
        );
        Ok(id)
    }

    async fn normalize(
        &self,
        form: SubmissionForm,
        submitter_ip: &str,
    ) -> Result<NewSubmission, IntakeError> {
        let business_name = required(form.business_name, "business_name")?;
        let contact_name = required(form.contact_name, "contact_name")?;
        let phone = required(form.phone, "phone")?;
        let email = required(form.email, "email")?;
        let address = required(form.address, "address")?;
        let description = required(form.description, "description")?;
        let services = non_blank(form.services);
        if services.is_empty() {
            return Err(IntakeError::MissingField("services"));
        }

        let mut city = non_empty(form.city);
        let mut state = non_empty(form.state);
        let mut state_code = non_empty(form.state_code);

        let supplied = match (form.latitude, form.longitude) {
            (Some(lat), Some(lng)) if lat != 0.0 && lng != 0.0 => GeoPoint::checked(lat, lng),
            _ => None,
        };
        let point = if let Some(point) = supplied {
            point
        } else {
            let found = self
                .geocoder
                .geocode(&address)
                .await
                .map_err(IntakeError::Geocoder)?
                .ok_or_else(|| IntakeError::GeocodeNotFound {
                    address: address.clone(),
                })?;
            tracing::debug!(%address, lat = found.latitude, lng = found.longitude, "geocoded submission");
            city = found.city.or(city);
            state = found.state.or(state);
            state_code = found.state_code.or(state_code);
            GeoPoint::checked(found.latitude, found.longitude).ok_or_else(|| {
                IntakeError::GeocodeNotFound {
                    address: address.clone(),
                }
            })?
        };

        Ok(NewSubmission {
            business_name,
            contact_name,
            phone,
            email,
            address,
            city,
            state,
            state_code,
            latitude: point.lat,
            longitude: point.lng,
            services,
            species: non_blank(form.species),
            service_radius_miles: normalize_service_radius(form.service_radius.as_ref()),
            description,
            website: non_empty(form.website),
            emergency_service: form.emergency_service,
            business_hours: form.business_hours.unwrap_or_default().trim().to_string(),
            submitter_ip: submitter_ip.to_string(),
        })
    }
}

/// Interpret a submitted radius the way a lenient integer parse would: the
/// leading integer of a string, or the truncated value of a number. Anything
/// non-positive or unparseable falls back to the default.
#[must_use]
pub fn normalize_service_radius(raw: Option<&Value>) -> u32 {
    let parsed = match raw {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(truncate_to_i64)),
        Some(Value::String(s)) => leading_integer(s),
        _ => None,
    };
    parsed
        .filter(|miles| *miles > 0)
        .and_then(|miles| u32::try_from(miles).ok())
        .unwrap_or(DEFAULT_SERVICE_RADIUS_MILES)
}

#[allow(clippy::cast_possible_truncation)]
fn truncate_to_i64(value: f64) -> i64 {
    value.trunc() as i64
}

fn leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

fn required(value: Option<String>, field: &'static str) -> Result<String, IntakeError> {
    non_empty(value).ok_or(IntakeError::MissingField(field))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn non_blank(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

#[cfg(test)]
#[path = "intake_test.rs"]
mod tests;
