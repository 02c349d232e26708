//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{InvalidPostcode, InvalidRadius, Postcode, SearchRadius};

/// Query string of the search form, the progress page and its event stream.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Postcode as typed, e.g. "sw1a 1aa"
    #[serde(default)]
    pub postcode: String,

    /// Radius in miles (defaults to 25)
    pub radius: Option<u32>,
}

impl SearchParams {
    /// Normalize the postcode and check the radius.
    pub fn validate(&self) -> Result<(Postcode, SearchRadius), InputError> {
        let postcode = Postcode::parse(&self.postcode)?;
        let radius = self.radius.map(SearchRadius::new).transpose()?.unwrap_or_default();
        Ok((postcode, radius))
    }

    /// Radius to show back in the form.
    pub fn radius_or_default(&self) -> u32 {
        self.radius.unwrap_or(u32::from(SearchRadius::DEFAULT))
    }
}

/// Rejected search form input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error(transparent)]
    Postcode(#[from] InvalidPostcode),

    #[error(transparent)]
    Radius(#[from] InvalidRadius),
}

/// Query string of a CSV download.
#[derive(Debug, Default, Deserialize)]
pub struct ExportParams {
    pub radius: Option<u32>,
}

/// Payload of a `progress` server-sent event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressUpdate {
    /// 1-based index of the window being fetched
    pub window: usize,

    /// Total number of windows in the run
    pub total: usize,

    /// Human-readable line, e.g. "Date window 3/24 (2025-03-01 → 2025-03-31)"
    pub label: String,

    /// Share of windows already completed, 0-100
    pub percent: u8,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(postcode: &str, radius: Option<u32>) -> SearchParams {
        SearchParams {
            postcode: postcode.into(),
            radius,
        }
    }

    #[test]
    fn validate_normalizes_postcode() {
        let (postcode, radius) = params(" sw1a 1aa ", Some(10)).validate().unwrap();
        assert_eq!(postcode.as_str(), "SW1A1AA");
        assert_eq!(radius.miles(), 10);
    }

    #[test]
    fn validate_defaults_radius() {
        let (_, radius) = params("SW1A1AA", None).validate().unwrap();
        assert_eq!(radius, SearchRadius::default());
    }

    #[test]
    fn validate_rejects_missing_postcode() {
        let err = params("   ", Some(10)).validate().unwrap_err();
        assert_eq!(err, InputError::Postcode(InvalidPostcode::Missing));
        assert_eq!(err.to_string(), "please enter a postcode");
    }

    #[test]
    fn validate_rejects_radius_out_of_range() {
        assert!(matches!(
            params("SW1A1AA", Some(0)).validate(),
            Err(InputError::Radius(_))
        ));
        assert!(matches!(
            params("SW1A1AA", Some(101)).validate(),
            Err(InputError::Radius(_))
        ));
    }

    #[test]
    fn search_params_from_query_string() {
        let parsed: SearchParams = serde_json::from_value(serde_json::json!({
            "radius": 40
        }))
        .unwrap();
        assert_eq!(parsed.postcode, "");
        assert_eq!(parsed.radius_or_default(), 40);
        assert_eq!(SearchParams::default().radius_or_default(), 25);
    }

    #[test]
    fn progress_update_serializes() {
        let update = ProgressUpdate {
            window: 3,
            total: 24,
            label: "Date window 3/24".into(),
            percent: 8,
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["window"], 3);
        assert_eq!(json["total"], 24);
        assert_eq!(json["percent"], 8);
    }
}
