use super::ApiError;
use crate::domain::Coordinates;

pub fn validate_location_id(raw: Option<&str>) -> Result<i32, ApiError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::validation("Missing location id"))?;

    match raw.parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::validation(format!(
            "Invalid location id: {}. ID must be a positive integer",
            raw
        ))),
    }
}

/// Both or neither coordinate must be present.
pub fn validate_coordinates(
    latitude: Option<&str>,
    longitude: Option<&str>,
) -> Result<Option<Coordinates>, ApiError> {
    fn present(v: Option<&str>) -> Option<&str> {
        v.map(str::trim).filter(|s| !s.is_empty())
    }

    match (present(latitude), present(longitude)) {
        (None, None) => Ok(None),
        (Some(lat), Some(lng)) => {
            let latitude = parse_degrees("latitude", lat, 90.0)?;
            let longitude = parse_degrees("longitude", lng, 180.0)?;
            Ok(Some(Coordinates::new(latitude, longitude)))
        }
        _ => Err(ApiError::validation(
            "Latitude and longitude must be given together",
        )),
    }
}

fn parse_degrees(name: &str, raw: &str, limit: f64) -> Result<f64, ApiError> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v.abs() <= limit => Ok(v),
        _ => Err(ApiError::validation(format!(
            "Invalid {}: {}. Must be between -{} and {}",
            name, raw, limit, limit
        ))),
    }
}

/// Rejects blank queries. Locations are keyed by the raw text, so the
/// query is returned unchanged.
pub fn validate_search_query(query: &str) -> Result<&str, ApiError> {
    if query.trim().is_empty() {
        return Err(ApiError::validation("Search query cannot be empty"));
    }
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_location_id() {
        assert_eq!(validate_location_id(Some("5")).unwrap(), 5);
        assert_eq!(validate_location_id(Some(" 12 ")).unwrap(), 12);
        assert!(validate_location_id(None).is_err());
        assert!(validate_location_id(Some("")).is_err());
        assert!(validate_location_id(Some("0")).is_err());
        assert!(validate_location_id(Some("abc")).is_err());
    }

    #[test]
    fn test_validate_coordinates() {
        assert_eq!(validate_coordinates(None, None).unwrap(), None);
        assert_eq!(
            validate_coordinates(Some("47.6"), Some("-122.3")).unwrap(),
            Some(Coordinates::new(47.6, -122.3))
        );
        assert!(validate_coordinates(Some("47.6"), None).is_err());
        assert!(validate_coordinates(Some("91"), Some("0")).is_err());
        assert!(validate_coordinates(Some("0"), Some("-180.5")).is_err());
        assert!(validate_coordinates(Some("north"), Some("0")).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("seattle").unwrap(), "seattle");
        assert_eq!(validate_search_query(" Seattle, WA ").unwrap(), " Seattle, WA ");
        assert!(validate_search_query("").is_err());
        assert!(validate_search_query("   ").is_err());
    }
}
