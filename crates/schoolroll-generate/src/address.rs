//! Composite family addresses of the form `"<street>, <city>, <state> <zip>"`.

use crate::errors::GenerationError;

/// Street, city, state and zip split out of a family address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressParts {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

pub fn format_family_address(street: &str, city: &str, state: &str, zip: &str) -> String {
    format!("{street}, {city}, {state} {zip}")
}

/// Split a family address into its parts. Segments after the third comma are
/// ignored; a missing segment is an error rather than an empty default.
pub fn parse_family_address(address: &str) -> Result<AddressParts, GenerationError> {
    let malformed = |reason| GenerationError::MalformedAddress {
        address: address.to_string(),
        reason,
    };

    let mut segments = address.split(',').map(str::trim);
    let street = segments
        .next()
        .filter(|value| !value.is_empty())
        .ok_or_else(|| malformed("missing street"))?;
    let city = segments
        .next()
        .filter(|value| !value.is_empty())
        .ok_or_else(|| malformed("missing city"))?;
    let state_zip = segments
        .next()
        .ok_or_else(|| malformed("missing state and zip"))?;

    let mut tokens = state_zip.split_whitespace();
    let state = tokens.next().ok_or_else(|| malformed("missing state"))?;
    let zip = tokens.next().ok_or_else(|| malformed("missing zip"))?;

    Ok(AddressParts {
        street: street.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        zip: zip.to_string(),
    })
}
