use serde::{Deserialize, Serialize};

/// Request body for adding points. The amount is taken as raw JSON so a
/// non-numeric value is reported as a validation failure rather than a body
/// rejection.
#[derive(Debug, Deserialize)]
pub struct AddPointsRequest {
    #[serde(default)]
    pub points: serde_json::Value,
}

impl AddPointsRequest {
    /// The amount, when it is a positive number. Integer and fractional
    /// amounts are both accepted, matching the numeric balance column.
    pub fn amount(&self) -> Option<f64> {
        self.points.as_f64().filter(|n| *n > 0.0)
    }
}

#[derive(Debug, Serialize)]
pub struct PointsResponse {
    pub points: f64,
}

#[derive(Debug, Serialize)]
pub struct AddPointsResponse {
    pub message: String,
    pub points: f64,
}
