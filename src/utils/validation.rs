use crate::utils::error::{Result, SsqError};
use chrono::NaiveDate;
use std::collections::HashSet;
use url::Url;

pub const RED_MAX: u32 = 33;
pub const BLUE_MAX: u32 = 16;
pub const RED_COUNT: usize = 6;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: &str, reason: impl Into<String>) -> SsqError {
    SsqError::ValidationError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Parses a ball number within `1..=max` and renders it zero-padded ("6" -> "06").
pub fn normalize_ball(field: &str, value: &str, max: u32) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid(field, value, "must be a number"));
    }
    let number: u32 = trimmed
        .parse()
        .map_err(|_| invalid(field, value, "must be a number"))?;
    if !(1..=max).contains(&number) {
        return Err(invalid(field, value, format!("must be between 01 and {:02}", max)));
    }
    Ok(format!("{:02}", number))
}

/// Checks a red-ball selection and returns it normalized to two-digit strings.
pub fn validate_red_balls<S: AsRef<str>>(red_balls: &[S]) -> Result<[String; RED_COUNT]> {
    let joined = red_balls
        .iter()
        .map(|b| b.as_ref())
        .collect::<Vec<_>>()
        .join(",");

    if red_balls.len() != RED_COUNT {
        return Err(invalid(
            "red balls",
            &joined,
            format!("expected {} numbers, got {}", RED_COUNT, red_balls.len()),
        ));
    }

    let mut normalized = Vec::with_capacity(RED_COUNT);
    for ball in red_balls {
        normalized.push(normalize_ball("red ball", ball.as_ref(), RED_MAX)?);
    }

    let distinct: HashSet<&String> = normalized.iter().collect();
    if distinct.len() != RED_COUNT {
        return Err(invalid("red balls", &joined, "numbers must be distinct"));
    }

    normalized
        .try_into()
        .map_err(|_| invalid("red balls", &joined, "expected 6 numbers"))
}

pub fn validate_blue_ball(blue_ball: &str) -> Result<String> {
    normalize_ball("blue ball", blue_ball, BLUE_MAX)
}

pub fn validate_period(period: &str) -> Result<()> {
    if period.len() != 5 || !period.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("period", period, "expected 5 digits, e.g. 22065"));
    }
    Ok(())
}

pub fn validate_date(date: &str) -> Result<()> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| invalid("date", date, "expected a calendar date in YYYY-MM-DD form"))
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(SsqError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(SsqError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(SsqError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(SsqError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(SsqError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(SsqError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}
