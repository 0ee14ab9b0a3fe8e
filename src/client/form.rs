use serde::{Deserialize, Serialize};
use serde_json::Number;
use thiserror::Error;

use crate::api::{Gender, GiftRequest};

pub const MIN_AGE: u32 = 1;
pub const MAX_AGE: u32 = 99;
pub const MAX_PRICE: u32 = 10_000;

/// Values currently entered in the gift form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormState {
    pub gender: Gender,
    pub age: Option<u32>,
    pub price_min: Option<u32>,
    pub price_max: Option<u32>,
    pub hobbies: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientValidationError {
    #[error("Please fill in all fields")]
    MissingFields,
    #[error("Age must be between 1 and 99")]
    AgeOutOfRange(u32),
    #[error("Maximum price must not exceed 10000")]
    PriceTooHigh(u32),
}

/// Checks the form and turns it into the request body.
pub fn validate(form: &FormState) -> Result<GiftRequest, ClientValidationError> {
    let present = |value: Option<u32>| value.filter(|v| *v > 0);
    let (Some(age), Some(price_min), Some(price_max)) =
        (present(form.age), present(form.price_min), present(form.price_max))
    else {
        return Err(ClientValidationError::MissingFields);
    };
    if form.hobbies.trim().is_empty() {
        return Err(ClientValidationError::MissingFields);
    }

    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(ClientValidationError::AgeOutOfRange(age));
    }
    if price_max > MAX_PRICE {
        return Err(ClientValidationError::PriceTooHigh(price_max));
    }

    Ok(GiftRequest {
        price_min: Some(Number::from(price_min)),
        price_max: Some(Number::from(price_max)),
        gender: Some(form.gender.to_string()),
        age: Some(Number::from(age)),
        hobbies: Some(form.hobbies.clone()),
    })
}
