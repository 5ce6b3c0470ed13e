//! Request validation. Rejects inputs that cannot name any record so that
//! "malformed" never masquerades as "not found".

use crate::error::QueryResult;
use crate::readers::normalize::{canonical_hour, canonical_point_query, clean_cell, KeyError};
use serde::Deserialize;
use std::borrow::Cow;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct SoilQuery {
    #[validate(custom(function = "validate_point"))]
    pub point: String,

    #[validate(custom(function = "validate_not_blank"))]
    pub depth: String,
}

impl SoilQuery {
    pub fn new(point: impl Into<String>, depth: impl Into<String>) -> Self {
        Self {
            point: point.into(),
            depth: depth.into(),
        }
    }

    pub fn checked(self) -> QueryResult<Self> {
        self.validate()?;
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct WeatherQuery {
    #[validate(custom(function = "validate_not_blank"))]
    pub date: String,

    #[validate(custom(function = "validate_hour"))]
    pub hour: String,
}

impl WeatherQuery {
    pub fn new(date: impl Into<String>, hour: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            hour: hour.into(),
        }
    }

    pub fn checked(self) -> QueryResult<Self> {
        self.validate()?;
        Ok(self)
    }
}

fn key_error(code: &'static str, error: KeyError) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Owned(error.to_string()));
    err
}

fn validate_point(value: &str) -> Result<(), ValidationError> {
    canonical_point_query(value)
        .map(|_| ())
        .map_err(|e| key_error("point", e))
}

fn validate_hour(value: &str) -> Result<(), ValidationError> {
    canonical_hour(value)
        .map(|_| ())
        .map_err(|e| key_error("hour", e))
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if clean_cell(value).is_empty() {
        Err(key_error("blank", KeyError::Empty))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;

    #[test]
    fn test_valid_soil_query() {
        assert!(SoilQuery::new("1", "0 a 20 cm").checked().is_ok());
        assert!(SoilQuery::new("-7", "0 a 20 cm").checked().is_ok());
        assert!(SoilQuery::new(" 003 ", "x").checked().is_ok());
    }

    #[test]
    fn test_invalid_soil_query() {
        match SoilQuery::new("one", "0 a 20 cm").checked() {
            Err(QueryError::InvalidInput(reason)) => {
                assert!(reason.contains("point"), "reason: {}", reason)
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
        match SoilQuery::new("1", " \"\" ").checked() {
            Err(QueryError::InvalidInput(reason)) => {
                assert!(reason.contains("depth"), "reason: {}", reason)
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_both_fields_reported() {
        match SoilQuery::new("", "").checked() {
            Err(QueryError::InvalidInput(reason)) => {
                assert!(reason.contains("point"));
                assert!(reason.contains("depth"));
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_weather_query() {
        assert!(WeatherQuery::new("01/01/2024", "7").checked().is_ok());
        assert!(WeatherQuery::new("01/01/2024", "0007").checked().is_ok());
        assert!(matches!(
            WeatherQuery::new("01/01/2024", "abc").checked(),
            Err(QueryError::InvalidInput(_))
        ));
        assert!(matches!(
            WeatherQuery::new("", "7").checked(),
            Err(QueryError::InvalidInput(_))
        ));
    }
}
