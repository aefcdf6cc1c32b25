//! # Country Codes
//!
//! Two-letter country codes used by toll offices, traffic queries, and
//! required-document lookups. Codes are normalised to upper case at
//! construction, so `"fr"` and `"FR"` compare equal.
//!
//! Two levels of validation exist because callers need both:
//!
//! - [`CountryCode::new`] checks shape only (exactly two ASCII letters).
//!   Traffic queries and toll offices accept any well-formed code.
//! - [`CountryCode::assigned`] additionally requires an assigned
//!   ISO 3166-1 alpha-2 code. Required-document lookups use it.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Assigned ISO 3166-1 alpha-2 codes, sorted for binary search.
const ISO_3166_ALPHA2: &[&str] = &[
    "AD", "AE", "AF", "AG", "AI", "AL", "AM", "AO", "AQ", "AR", "AS", "AT", "AU", "AW", "AX",
    "AZ", "BA", "BB", "BD", "BE", "BF", "BG", "BH", "BI", "BJ", "BL", "BM", "BN", "BO", "BQ",
    "BR", "BS", "BT", "BV", "BW", "BY", "BZ", "CA", "CC", "CD", "CF", "CG", "CH", "CI", "CK",
    "CL", "CM", "CN", "CO", "CR", "CU", "CV", "CW", "CX", "CY", "CZ", "DE", "DJ", "DK", "DM",
    "DO", "DZ", "EC", "EE", "EG", "EH", "ER", "ES", "ET", "FI", "FJ", "FK", "FM", "FO", "FR",
    "GA", "GB", "GD", "GE", "GF", "GG", "GH", "GI", "GL", "GM", "GN", "GP", "GQ", "GR", "GS",
    "GT", "GU", "GW", "GY", "HK", "HM", "HN", "HR", "HT", "HU", "ID", "IE", "IL", "IM", "IN",
    "IO", "IQ", "IR", "IS", "IT", "JE", "JM", "JO", "JP", "KE", "KG", "KH", "KI", "KM", "KN",
    "KP", "KR", "KW", "KY", "KZ", "LA", "LB", "LC", "LI", "LK", "LR", "LS", "LT", "LU", "LV",
    "LY", "MA", "MC", "MD", "ME", "MF", "MG", "MH", "MK", "ML", "MM", "MN", "MO", "MP", "MQ",
    "MR", "MS", "MT", "MU", "MV", "MW", "MX", "MY", "MZ", "NA", "NC", "NE", "NF", "NG", "NI",
    "NL", "NO", "NP", "NR", "NU", "NZ", "OM", "PA", "PE", "PF", "PG", "PH", "PK", "PL", "PM",
    "PN", "PR", "PS", "PT", "PW", "PY", "QA", "RE", "RO", "RS", "RU", "RW", "SA", "SB", "SC",
    "SD", "SE", "SG", "SH", "SI", "SJ", "SK", "SL", "SM", "SN", "SO", "SR", "SS", "ST", "SV",
    "SX", "SY", "SZ", "TC", "TD", "TF", "TG", "TH", "TJ", "TK", "TL", "TM", "TN", "TO", "TR",
    "TT", "TV", "TW", "TZ", "UA", "UG", "UM", "US", "UY", "UZ", "VA", "VC", "VE", "VG", "VI",
    "VN", "VU", "WF", "WS", "YE", "YT", "ZA", "ZM", "ZW",
];

/// A two-letter country code, stored in upper case.
///
/// Deserialization goes through [`CountryCode::new`], so a malformed code in
/// a request body or reference-data file is rejected rather than stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    /// Create a country code, validating that it is exactly two ASCII letters.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCountryCode`] for any other shape.
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let raw = value.as_ref();
        if raw.len() != 2 || !raw.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::InvalidCountryCode(raw.to_string()));
        }
        Ok(Self(raw.to_ascii_uppercase()))
    }

    /// Create a country code that must be an assigned ISO 3166-1 alpha-2 code.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCountryCode`] for malformed input and
    /// [`ValidationError::UnknownCountry`] for unassigned codes such as `"ZZ"`.
    pub fn assigned(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let code = Self::new(value.as_ref())?;
        if !code.is_assigned() {
            return Err(ValidationError::UnknownCountry(value.as_ref().to_string()));
        }
        Ok(code)
    }

    /// Whether this code appears in the ISO 3166-1 alpha-2 registry.
    pub fn is_assigned(&self) -> bool {
        ISO_3166_ALPHA2.binary_search(&self.0.as_str()).is_ok()
    }

    /// Access the upper-case code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CountryCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.0
    }
}

impl std::fmt::Display for CountryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
