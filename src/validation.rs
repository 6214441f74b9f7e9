// Validation utilities module
// Provides custom validation functions for domain-specific rules

use rust_decimal::Decimal;
use validator::ValidationError;

/// Validates that a review rating lies within 0.0..=5.0
pub fn validate_rating_range(rating: &Decimal) -> Result<(), ValidationError> {
    if *rating < Decimal::ZERO || *rating > Decimal::from(5) {
        Err(ValidationError::new("rating_out_of_range"))
    } else {
        Ok(())
    }
}

/// Validates a service location stored as a "lat,lon" string (e.g. "36.81,10.17")
pub fn validate_location(location: &str) -> Result<(), ValidationError> {
    let mut parts = location.split(',');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(lat), Some(lon), None)
            if lat.trim().parse::<f64>().is_ok() && lon.trim().parse::<f64>().is_ok() =>
        {
            Ok(())
        }
        _ => Err(ValidationError::new("invalid_location")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rating_bounds_are_inclusive() {
        assert!(validate_rating_range(&dec!(0.0)).is_ok());
        assert!(validate_rating_range(&dec!(5.0)).is_ok());
        assert!(validate_rating_range(&dec!(3.5)).is_ok());
        assert!(validate_rating_range(&dec!(5.1)).is_err());
        assert!(validate_rating_range(&dec!(-0.1)).is_err());
    }

    #[test]
    fn location_must_be_lat_lon_pair() {
        assert!(validate_location("36.81,10.17").is_ok());
        assert!(validate_location("0,0").is_ok());
        assert!(validate_location("tunis").is_err());
        assert!(validate_location("36.81").is_err());
        assert!(validate_location("36.81,10.17,5").is_err());
    }
}
