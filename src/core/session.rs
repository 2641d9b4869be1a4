//! Entry-flow state machine for one invoice form.
//!
//! `Editing -> Submitting -> {Success -> Editing (reset), Failed -> Editing (unchanged)}`

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::challenge::Challenge;
use super::error::{ErrorKind, FacturaError, ValidationError};
use super::ledger::LineLedger;
use super::types::*;
use super::validation::{Field, gate_document, validate_field};

/// How long the success banner stays before the form resets.
pub const SUCCESS_DISPLAY_DELAY: Duration = Duration::from_secs(3);

/// Notice shown when a transport failure is reported as success.
pub const UNWIRED_ENDPOINT_NOTICE: &str =
    "invoice validated correctly; the submission endpoint is not wired yet";

/// What the backend (or the attempt to reach it) said about a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The backend acknowledged the document.
    Accepted,
    /// The backend answered and refused the document.
    Rejected(String),
    /// The backend could not be reached.
    TransportUnavailable(String),
}

/// How [`SubmissionOutcome::TransportUnavailable`] is reported to the user.
///
/// Only an unreachable backend is affected. An HTTP error status, including
/// the 404 of an endpoint that is not deployed yet, maps to
/// [`SubmissionOutcome::Rejected`] and is a failure under either policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportPolicy {
    /// Report as success with a notice (current behavior while no backend exists).
    #[default]
    TreatUnavailableAsAccepted,
    /// Report as failure.
    Strict,
}

/// Phase of the entry flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Editing,
    /// A submission is in flight; further attempts are ignored.
    Submitting,
    /// Success banner is showing; the form resets at `reset_at`.
    Success {
        reset_at: Instant,
        notice: Option<String>,
    },
    /// Submission failed; fields are kept for correction.
    Failed { reason: String },
}

/// Result of completing a submission, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionReport {
    Succeeded { notice: Option<String> },
    Failed { reason: String },
}

impl SubmissionReport {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

/// One invoice entry form: header fields, lines, challenge and phase.
///
/// ```
/// use factura::core::*;
/// use rust_decimal_macros::dec;
///
/// let mut session = FormSession::new();
/// session.add_line(LineDraft::new("Mano de obra", dec!(1), dec!(50), 10)).unwrap();
/// let errors = session.set_field(Field::Phone, "12345");
/// assert_eq!(errors[0].kind, ErrorKind::PatternMismatch);
/// ```
#[derive(Debug)]
pub struct FormSession {
    form: InvoiceForm,
    ledger: LineLedger,
    challenge: Challenge,
    phase: Phase,
    policy: TransportPolicy,
    field_errors: BTreeMap<Field, ValidationError>,
    rng: StdRng,
    clock: fn() -> NaiveDate,
}

impl Default for FormSession {
    fn default() -> Self {
        Self::new()
    }
}

impl FormSession {
    /// Fresh session dated today with a random challenge.
    pub fn new() -> Self {
        let mut rng = StdRng::from_entropy();
        let challenge = Challenge::generate(&mut rng);
        Self {
            form: InvoiceForm::new(today()),
            ledger: LineLedger::new(),
            challenge,
            phase: Phase::Editing,
            policy: TransportPolicy::default(),
            field_errors: BTreeMap::new(),
            rng,
            clock: today,
        }
    }

    pub fn with_policy(mut self, policy: TransportPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Use a seeded RNG for challenges. Re-issues the current challenge.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self.challenge = Challenge::generate(&mut self.rng);
        self
    }

    /// Use a custom source for the default date. Re-dates the form.
    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self.form.date = clock();
        self
    }

    pub fn form(&self) -> &InvoiceForm {
        &self.form
    }

    pub fn ledger(&self) -> &LineLedger {
        &self.ledger
    }

    pub fn lines(&self) -> &[LineItem] {
        self.ledger.lines()
    }

    pub fn totals(&self) -> Totals {
        self.ledger.totals()
    }

    pub fn challenge(&self) -> &Challenge {
        &self.challenge
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn policy(&self) -> TransportPolicy {
        self.policy
    }

    /// True while a submission is in flight.
    pub fn is_busy(&self) -> bool {
        self.phase == Phase::Submitting
    }

    /// Errors of the fields edited (or checked) so far.
    pub fn field_errors(&self) -> impl Iterator<Item = &ValidationError> {
        self.field_errors.values()
    }

    pub fn field_error(&self, field: Field) -> Option<&ValidationError> {
        self.field_errors.get(&field)
    }

    /// Update one field from its typed value and re-validate it and its dependents.
    ///
    /// Returns the current errors of the touched fields. Ignored while submitting.
    pub fn set_field(&mut self, field: Field, value: &str) -> Vec<ValidationError> {
        if self.is_busy() {
            tracing::debug!(field = field.name(), "edit ignored while submitting");
            return Vec::new();
        }
        self.leave_failed();

        let parse_error = match field {
            Field::Date => match NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
                Ok(date) => {
                    self.form.date = date;
                    None
                }
                Err(_) => Some(ValidationError::new(
                    field.name(),
                    format!("'{}' is not a date (YYYY-MM-DD)", value.trim()),
                    ErrorKind::PatternMismatch,
                )),
            },
            Field::IdentifierType => match IdentifierType::from_code(value) {
                Some(kind) => {
                    self.form.identifier_type = kind;
                    None
                }
                None => Some(ValidationError::new(
                    field.name(),
                    format!("'{}' is not NIF or CIF", value.trim()),
                    ErrorKind::PatternMismatch,
                )),
            },
            _ => {
                if let Some(slot) = self.text_slot(field) {
                    *slot = value.to_string();
                }
                None
            }
        };

        let mut touched = vec![field];
        touched.extend_from_slice(field.dependents());

        for f in &touched {
            let error = if *f == field && parse_error.is_some() {
                parse_error.clone()
            } else {
                validate_field(*f, &self.form, &self.challenge)
            };
            match error {
                Some(e) => {
                    self.field_errors.insert(*f, e);
                }
                None => {
                    self.field_errors.remove(f);
                }
            }
        }

        touched
            .iter()
            .filter_map(|f| self.field_errors.get(f).cloned())
            .collect()
    }

    /// Set the identifier type and re-check the identifier against it.
    pub fn set_identifier_type(&mut self, kind: IdentifierType) -> Vec<ValidationError> {
        self.set_field(Field::IdentifierType, kind.code())
    }

    /// Add a line. Refused with [`FacturaError::Busy`] while submitting.
    pub fn add_line(&mut self, draft: LineDraft) -> Result<LineItem, FacturaError> {
        if self.is_busy() {
            tracing::debug!("line add ignored while submitting");
            return Err(FacturaError::Busy);
        }
        self.leave_failed();
        self.ledger.add_line(draft)
    }

    /// Remove a line by id. A no-op returning `None` while submitting.
    pub fn remove_line(&mut self, id: u64) -> Option<LineItem> {
        if self.is_busy() {
            tracing::debug!(id, "line removal ignored while submitting");
            return None;
        }
        self.leave_failed();
        self.ledger.remove_line(id)
    }

    /// Validate every field now, recording the errors as live field errors.
    pub fn validate_all(&mut self) -> Vec<ValidationError> {
        self.field_errors.clear();
        for field in Field::ALL {
            if let Some(e) = validate_field(field, &self.form, &self.challenge) {
                self.field_errors.insert(field, e);
            }
        }
        self.field_errors.values().cloned().collect()
    }

    /// Enter `Submitting` if the document gate passes.
    ///
    /// Returns `Ok(None)` when a submission is already in flight (the attempt
    /// is ignored), and `Err(FacturaError::Refused)` when the gate fails.
    pub fn begin_submission(&mut self) -> Result<Option<InvoiceDocument>, FacturaError> {
        if self.is_busy() {
            tracing::debug!("submission already in flight, ignoring repeated attempt");
            return Ok(None);
        }
        if matches!(self.phase, Phase::Success { .. }) {
            tracing::debug!("submission ignored while success banner is showing");
            return Ok(None);
        }
        self.leave_failed();

        match gate_document(&self.form, &self.challenge, &self.ledger) {
            Ok(document) => {
                self.phase = Phase::Submitting;
                tracing::info!(
                    invoice = %document.invoice_number,
                    lines = document.lines.len(),
                    total = %document.totals.grand_total,
                    "submitting invoice"
                );
                Ok(Some(document))
            }
            Err(err) => {
                self.validate_all();
                tracing::debug!(error = %err, "submission refused");
                Err(err)
            }
        }
    }

    /// Apply the outcome of the in-flight submission.
    ///
    /// Returns `None` if no submission was in flight.
    pub fn complete_submission(
        &mut self,
        outcome: SubmissionOutcome,
        now: Instant,
    ) -> Option<SubmissionReport> {
        if !self.is_busy() {
            tracing::warn!(?outcome, "submission outcome arrived with nothing in flight");
            return None;
        }

        let report = match (outcome, self.policy) {
            (SubmissionOutcome::Accepted, _) => {
                tracing::info!(invoice = %self.form.invoice_number, "invoice accepted");
                SubmissionReport::Succeeded { notice: None }
            }
            (SubmissionOutcome::Rejected(reason), _) => {
                tracing::warn!(invoice = %self.form.invoice_number, %reason, "invoice rejected by backend");
                SubmissionReport::Failed { reason }
            }
            (
                SubmissionOutcome::TransportUnavailable(reason),
                TransportPolicy::TreatUnavailableAsAccepted,
            ) => {
                tracing::warn!(
                    invoice = %self.form.invoice_number,
                    %reason,
                    "submission endpoint unreachable; reporting success per transport policy"
                );
                SubmissionReport::Succeeded {
                    notice: Some(UNWIRED_ENDPOINT_NOTICE.to_string()),
                }
            }
            (SubmissionOutcome::TransportUnavailable(reason), TransportPolicy::Strict) => {
                tracing::warn!(invoice = %self.form.invoice_number, %reason, "submission endpoint unreachable");
                SubmissionReport::Failed { reason }
            }
        };

        self.phase = match &report {
            SubmissionReport::Succeeded { notice } => Phase::Success {
                reset_at: now + SUCCESS_DISPLAY_DELAY,
                notice: notice.clone(),
            },
            SubmissionReport::Failed { reason } => Phase::Failed {
                reason: reason.clone(),
            },
        };
        Some(report)
    }

    /// Advance timers. Resets the session once the success banner has expired.
    ///
    /// Returns true if a reset happened.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.phase {
            Phase::Success { reset_at, .. } if now >= reset_at => {
                self.reset();
                true
            }
            _ => false,
        }
    }

    /// Return from `Failed` to `Editing`, keeping every field.
    pub fn dismiss_failure(&mut self) {
        self.leave_failed();
    }

    /// Restore defaults: empty form, no lines, fresh challenge, today's date, NIF.
    pub fn reset(&mut self) {
        self.form = InvoiceForm::new((self.clock)());
        self.ledger = LineLedger::new();
        self.challenge = Challenge::generate(&mut self.rng);
        self.field_errors.clear();
        self.phase = Phase::Editing;
        tracing::debug!("form session reset");
    }

    fn text_slot(&mut self, field: Field) -> Option<&mut String> {
        let form = &mut self.form;
        match field {
            Field::InvoiceNumber => Some(&mut form.invoice_number),
            Field::ClientName => Some(&mut form.client_name),
            Field::Address => Some(&mut form.address),
            Field::Province => Some(&mut form.province),
            Field::City => Some(&mut form.city),
            Field::Identifier => Some(&mut form.identifier),
            Field::Phone => Some(&mut form.phone),
            Field::Email => Some(&mut form.email),
            Field::Challenge => Some(&mut form.challenge_answer),
            Field::Date | Field::IdentifierType => None,
        }
    }

    fn leave_failed(&mut self) {
        if matches!(self.phase, Phase::Failed { .. }) {
            self.phase = Phase::Editing;
        }
    }
}
