use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::ValidationErrors;

/// Basic `local@domain.tld` shape, no whitespace.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex"));

/// Digits with an optional leading `+` and `-`, `(`, `)` or space separators.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9()\- ]{7,20}$").expect("Invalid regex"));

/// Where and to whom an order ships.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeliveryInfo {
    pub full_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub zip: String,
    pub country: String,
    pub phone: String,
}

impl DeliveryInfo {
    /// Copy with surrounding whitespace removed from every field.
    pub fn trimmed(&self) -> Self {
        Self {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            zip: self.zip.trim().to_string(),
            country: self.country.trim().to_string(),
            phone: self.phone.trim().to_string(),
        }
    }

    /// Check every field and report all violations together.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        errors.require("fullName", &self.full_name, "Full name is required.");

        if self.email.trim().is_empty() {
            errors.add("email", "Email is required.");
        } else if !is_valid_email(self.email.trim()) {
            errors.add("email", "Email address is invalid.");
        }

        errors.require("address", &self.address, "Address is required.");
        errors.require("country", &self.country, "Country is required.");
        errors.require("city", &self.city, "City is required.");
        errors.require("zip", &self.zip, "Zip code is required.");

        if self.phone.trim().is_empty() {
            errors.add("phone", "Phone number is required.");
        } else if !is_valid_phone(self.phone.trim()) {
            errors.add("phone", "Phone number is invalid.");
        }

        errors.into_result()
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE_RE.is_match(value) && value.chars().any(|c| c.is_ascii_digit())
}
