use std::sync::LazyLock;

use regex::Regex;

use super::challenge::Challenge;
use super::error::{ErrorKind, FacturaError, ValidationError};
use super::identifier::validate_identifier;
use super::ledger::LineLedger;
use super::types::*;

/// Minimum length of the client name after trimming.
pub const MIN_CLIENT_NAME_LEN: usize = 3;

// HTML "valid e-mail address" grammar.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is valid")
});

/// An editable field of the invoice form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    InvoiceNumber,
    Date,
    ClientName,
    Address,
    Province,
    City,
    IdentifierType,
    Identifier,
    Phone,
    Email,
    Challenge,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Self::InvoiceNumber,
        Self::Date,
        Self::ClientName,
        Self::Address,
        Self::Province,
        Self::City,
        Self::IdentifierType,
        Self::Identifier,
        Self::Phone,
        Self::Email,
        Self::Challenge,
    ];

    /// Name used in validation errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::InvoiceNumber => "numero_factura",
            Self::Date => "fecha",
            Self::ClientName => "nombre_cliente",
            Self::Address => "direccion",
            Self::Province => "provincia",
            Self::City => "ciudad",
            Self::IdentifierType => "tipo_documento",
            Self::Identifier => "numero_documento",
            Self::Phone => "telefono",
            Self::Email => "email",
            Self::Challenge => "captcha",
        }
    }

    /// Fields whose validity depends on this one and must be re-checked when it changes.
    pub fn dependents(&self) -> &'static [Field] {
        match self {
            Self::IdentifierType => &[Self::Identifier],
            _ => &[],
        }
    }
}

/// Non-empty after trimming.
pub fn check_required(field: Field, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::required(field.name()))
    } else {
        Ok(())
    }
}

/// Digits only (at least one).
pub fn check_digits(field: Field, value: &str) -> Result<(), ValidationError> {
    check_required(field, value)?;
    if value.trim().chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new(
            field.name(),
            "must contain digits only",
            ErrorKind::PatternMismatch,
        ))
    }
}

/// Exactly nine digits.
pub fn check_phone(value: &str) -> Result<(), ValidationError> {
    check_required(Field::Phone, value)?;
    let v = value.trim();
    if v.len() == 9 && v.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new(
            Field::Phone.name(),
            format!("phone must be exactly 9 digits, got '{v}'"),
            ErrorKind::PatternMismatch,
        ))
    }
}

pub fn check_email(value: &str) -> Result<(), ValidationError> {
    check_required(Field::Email, value)?;
    let v = value.trim();
    if EMAIL_RE.is_match(v) {
        Ok(())
    } else {
        Err(ValidationError::new(
            Field::Email.name(),
            format!("'{v}' is not a valid e-mail address"),
            ErrorKind::PatternMismatch,
        ))
    }
}

pub fn check_client_name(value: &str) -> Result<(), ValidationError> {
    check_required(Field::ClientName, value)?;
    if value.trim().chars().count() < MIN_CLIENT_NAME_LEN {
        return Err(ValidationError::new(
            Field::ClientName.name(),
            format!("client name must be at least {MIN_CLIENT_NAME_LEN} characters"),
            ErrorKind::TooShort,
        ));
    }
    Ok(())
}

/// Validate one field against a snapshot of the whole form.
///
/// Taking the whole form lets the identifier check read its sibling
/// identifier type without shared state.
pub fn validate_field(
    field: Field,
    form: &InvoiceForm,
    challenge: &Challenge,
) -> Option<ValidationError> {
    let result = match field {
        Field::InvoiceNumber => check_digits(field, &form.invoice_number),
        // Typed as a date, always present.
        Field::Date | Field::IdentifierType => Ok(()),
        Field::ClientName => check_client_name(&form.client_name),
        Field::Address => check_required(field, &form.address),
        Field::Province => check_required(field, &form.province),
        Field::City => check_required(field, &form.city),
        Field::Identifier => check_required(field, &form.identifier)
            .and_then(|()| validate_identifier(form.identifier_type, &form.identifier)),
        Field::Phone => check_phone(&form.phone),
        Field::Email => check_email(&form.email),
        Field::Challenge => challenge.check(&form.challenge_answer),
    };
    result.err()
}

/// Validate every form field. Returns all errors found (not just the first).
pub fn validate_form(form: &InvoiceForm, challenge: &Challenge) -> Vec<ValidationError> {
    Field::ALL
        .iter()
        .filter_map(|f| validate_field(*f, form, challenge))
        .collect()
}

/// Document-level validation: every field check plus a non-empty line set.
pub fn validate_document(
    form: &InvoiceForm,
    challenge: &Challenge,
    lines: &[LineItem],
) -> Vec<ValidationError> {
    let mut errors = validate_form(form, challenge);
    if lines.is_empty() {
        errors.push(ValidationError::new(
            "lineas",
            "invoice must have at least one line",
            ErrorKind::EmptyLineSet,
        ));
    }
    errors
}

/// Run the submission gate and assemble the document if it passes.
pub fn gate_document(
    form: &InvoiceForm,
    challenge: &Challenge,
    ledger: &LineLedger,
) -> Result<InvoiceDocument, FacturaError> {
    let errors = validate_document(form, challenge, ledger.lines());
    if !errors.is_empty() {
        return Err(FacturaError::Refused(errors));
    }
    Ok(InvoiceDocument::assemble(
        form,
        ledger.lines(),
        ledger.totals(),
    ))
}
