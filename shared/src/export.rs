use crate::geo::GeoPoint;

/// Suggested name for the downloaded route.
pub const EXPORT_FILE_NAME: &str = "safe-runner-route.json";
/// Key-value entry holding the most recent session, overwritten each time.
pub const LAST_RUN_KEY: &str = "lastRun";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("invalid route JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialize a route as a bare JSON array of `{"lat", "lng"}` objects.
pub fn route_to_json(path: &[GeoPoint]) -> Result<String, ExportError> {
    Ok(serde_json::to_string(path)?)
}

/// Parse a route written by [`route_to_json`]. Out-of-range points are rejected.
pub fn route_from_json(json: &str) -> Result<Vec<GeoPoint>, ExportError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    #[test]
    fn test_route_json_shape() {
        let path = vec![
            GeoPoint::new(28.6139, 77.209).unwrap(),
            GeoPoint::new(28.614, 77.2091).unwrap(),
        ];
        let encoded = route_to_json(&path).unwrap();
        let value: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(
            value,
            json!([
                {"lat": 28.6139, "lng": 77.209},
                {"lat": 28.614, "lng": 77.2091}
            ])
        );
        assert_eq!(route_from_json(&encoded).unwrap(), path);
    }

    #[test]
    fn test_empty_route() {
        assert_eq!(route_to_json(&[]).unwrap(), "[]");
        assert!(route_from_json("[]").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_bad_points() {
        assert!(route_from_json(r#"[{"lat": 95.0, "lng": 1.0}]"#).is_err());
        assert!(route_from_json(r#"[{"lat": 1.0}]"#).is_err());
        assert!(route_from_json(r#"{"lat": 1.0, "lng": 1.0}"#).is_err());
    }
}
