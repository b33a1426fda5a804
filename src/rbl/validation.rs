use crate::{Money, Result};

use thiserror::Error;

pub const MIN_NAME_LEN: usize = 2;

/// Input errors, always raised before the store is touched
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Invalid amount {0}: must be a positive whole number")]
    InvalidAmount(Money),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{0} must have at least {MIN_NAME_LEN} characters")]
    NameTooShort(&'static str),
}

pub fn validate_amount(amount: Money) -> Result<Money> {
    if !amount.is_positive() {
        Err(ValidationError::InvalidAmount(amount))?
    }

    return Ok(amount);
}

/// Trims `name` and checks it is long enough, `field` names it in the error
pub fn validate_name(field: &'static str, name: &str) -> Result<String> {
    let name = name.trim();

    if name.is_empty() {
        Err(ValidationError::MissingField(field))?
    }

    if name.chars().count() < MIN_NAME_LEN {
        Err(ValidationError::NameTooShort(field))?
    }

    return Ok(name.to_string());
}
