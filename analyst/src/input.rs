//! Conversion of raw command-line text into typed query arguments.

use crate::cli::FilterArgs;
use crate::error::InputError;
use cell_query::CellFilters;
use chrono::NaiveDate;

pub fn required(field: &'static str, value: &str) -> Result<String, InputError> {
    let value = value.trim();
    if value.is_empty() {
        Err(InputError::Missing(field))
    } else {
        Ok(value.to_string())
    }
}

fn number(field: &'static str, value: &str) -> Result<f64, InputError> {
    let value = required(field, value)?;
    value
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or(InputError::NotANumber { field, value })
}

pub fn radius_km(value: &str) -> Result<f64, InputError> {
    let radius = number("radius", value)?;
    if radius > 0.0 {
        Ok(radius)
    } else {
        Err(InputError::OutOfRange {
            field: "radius",
            value: value.trim().to_string(),
        })
    }
}

pub fn latitude(field: &'static str, value: &str) -> Result<f64, InputError> {
    in_range(field, value, 90.0)
}

pub fn longitude(field: &'static str, value: &str) -> Result<f64, InputError> {
    in_range(field, value, 180.0)
}

fn in_range(field: &'static str, value: &str, limit: f64) -> Result<f64, InputError> {
    let n = number(field, value)?;
    if (-limit..=limit).contains(&n) {
        Ok(n)
    } else {
        Err(InputError::OutOfRange {
            field,
            value: value.trim().to_string(),
        })
    }
}

/// Whole number; sign checks belong to the query layer.
pub fn integer(field: &'static str, value: &str) -> Result<i64, InputError> {
    let value = required(field, value)?;
    value
        .parse::<i64>()
        .map_err(|_| InputError::NotANumber { field, value })
}

pub fn technology(value: &str) -> Result<i32, InputError> {
    let value = value.trim();
    match value.to_ascii_uppercase().as_str() {
        "2G" | "GSM" => Ok(2),
        "3G" | "UMTS" => Ok(3),
        "4G" | "LTE" => Ok(4),
        "5G" | "NR" => Ok(5),
        other => other
            .parse::<i32>()
            .map_err(|_| InputError::UnknownTechnology(value.to_string())),
    }
}

pub fn date(field: &'static str, value: &str) -> Result<NaiveDate, InputError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y/%m/%d"))
        .map_err(|_| InputError::BadDate {
            field,
            value: value.to_string(),
        })
}

pub fn filters(args: &FilterArgs) -> Result<CellFilters, InputError> {
    let technologies = args
        .technologies
        .iter()
        .filter(|t| !t.trim().is_empty())
        .map(|t| technology(t))
        .collect::<Result<Vec<_>, _>>()?;
    let operators = args
        .operators
        .iter()
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect();

    Ok(CellFilters {
        technologies,
        operators,
        start_date: args
            .start_date
            .as_deref()
            .map(|d| date("start date", d))
            .transpose()?,
        end_date: args
            .end_date
            .as_deref()
            .map(|d| date("end date", d))
            .transpose()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_must_be_a_positive_number() {
        assert_eq!(radius_km(" 2.5 "), Ok(2.5));
        assert_eq!(
            radius_km("two"),
            Err(InputError::NotANumber {
                field: "radius",
                value: "two".into()
            })
        );
        assert!(matches!(radius_km("0"), Err(InputError::OutOfRange { .. })));
        assert!(matches!(radius_km("-1"), Err(InputError::OutOfRange { .. })));
        assert!(matches!(radius_km("NaN"), Err(InputError::NotANumber { .. })));
        assert_eq!(radius_km(""), Err(InputError::Missing("radius")));
    }

    #[test]
    fn coordinates_are_range_checked() {
        assert_eq!(latitude("latitude", "38.7"), Ok(38.7));
        assert_eq!(longitude("longitude", "-9.1"), Ok(-9.1));
        assert!(matches!(
            latitude("latitude", "91"),
            Err(InputError::OutOfRange { .. })
        ));
        assert!(matches!(
            longitude("longitude", "-180.5"),
            Err(InputError::OutOfRange { .. })
        ));
    }

    #[test]
    fn integers_keep_their_sign() {
        assert_eq!(integer("LAC/TAC", "8840"), Ok(8840));
        assert_eq!(integer("LAC/TAC", "-3"), Ok(-3));
        assert!(matches!(
            integer("LAC/TAC", "88.4"),
            Err(InputError::NotANumber { .. })
        ));
    }

    #[test]
    fn filters_are_parsed() {
        let args = FilterArgs {
            technologies: vec!["4g".into(), "NR".into(), "10".into(), String::new()],
            operators: vec![" MEO ".into(), String::new()],
            start_date: Some("2024-01-31".into()),
            end_date: Some("2024/12/31".into()),
        };
        let filters = filters(&args).unwrap();
        assert_eq!(filters.technologies, vec![4, 5, 10]);
        assert_eq!(filters.operators, vec!["MEO"]);
        assert_eq!(filters.start_date, NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(filters.end_date, NaiveDate::from_ymd_opt(2024, 12, 31));

        let bad = FilterArgs {
            technologies: vec!["6G".into()],
            ..FilterArgs::default()
        };
        assert_eq!(
            super::filters(&bad),
            Err(InputError::UnknownTechnology("6G".into()))
        );

        let bad = FilterArgs {
            start_date: Some("31/01/2024".into()),
            ..FilterArgs::default()
        };
        assert!(matches!(super::filters(&bad), Err(InputError::BadDate { .. })));
    }
}
