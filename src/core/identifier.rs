//! NIF checksum and CIF format validation.

use super::error::{ErrorKind, ValidationError};
use super::types::IdentifierType;

/// Control letters indexed by `number mod 23`.
pub const NIF_CONTROL_LETTERS: &str = "TRWAGMYFPDXBNJZSQVHLCKE";

const FIELD: &str = "numero_documento";

/// Control letter for the 8-digit numeric part of a NIF.
pub fn nif_control_letter(number: u32) -> char {
    let idx = (number % 23) as usize;
    NIF_CONTROL_LETTERS.as_bytes()[idx] as char
}

/// Validate a NIF: 8 digits followed by the matching control letter.
///
/// Input is upper-cased first, so `"12345678z"` is accepted.
pub fn validate_nif(value: &str) -> Result<(), ValidationError> {
    let value = value.trim().to_ascii_uppercase();
    let bytes = value.as_bytes();

    if bytes.len() != 9
        || !bytes[..8].iter().all(u8::is_ascii_digit)
        || !bytes[8].is_ascii_uppercase()
    {
        return Err(ValidationError::new(
            FIELD,
            format!("NIF '{value}' must be 8 digits followed by a letter"),
            ErrorKind::PatternMismatch,
        ));
    }

    let number: u32 = value[..8].parse().map_err(|_| {
        ValidationError::new(FIELD, "NIF number is not numeric", ErrorKind::PatternMismatch)
    })?;
    let expected = nif_control_letter(number);
    let supplied = bytes[8] as char;

    if supplied != expected {
        return Err(ValidationError::new(
            FIELD,
            format!("NIF control letter '{supplied}' is wrong, expected '{expected}'"),
            ErrorKind::ChecksumInvalid,
        ));
    }
    Ok(())
}

/// Validate a CIF by format only: letter, 7 digits, alphanumeric control character.
///
/// The control character is not checked arithmetically.
pub fn validate_cif(value: &str) -> Result<(), ValidationError> {
    let value = value.trim().to_ascii_uppercase();
    let bytes = value.as_bytes();

    let ok = bytes.len() == 9
        && bytes[0].is_ascii_uppercase()
        && bytes[1..8].iter().all(u8::is_ascii_digit)
        && (bytes[8].is_ascii_uppercase() || bytes[8].is_ascii_digit());

    if !ok {
        return Err(ValidationError::new(
            FIELD,
            format!("CIF '{value}' must be a letter, 7 digits and a control character"),
            ErrorKind::FormatInvalid,
        ));
    }
    Ok(())
}

/// Validate an identifier according to its type.
pub fn validate_identifier(kind: IdentifierType, value: &str) -> Result<(), ValidationError> {
    match kind {
        IdentifierType::Nif => validate_nif(value),
        IdentifierType::Cif => validate_cif(value),
    }
}
