use std::time::Instant;

use factura::core::views::{DashboardSummary, resolve};
use factura::core::*;
use rust_decimal_macros::dec;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();

    let view = resolve("/");
    let summary = DashboardSummary::placeholder();
    println!(
        "{}: showing '{}' (redirected: {}), {} invoices this month",
        summary.business_name, view.path, view.redirected, summary.invoices_this_month
    );

    let mut session = FormSession::new();
    println!("Challenge:      {}", session.challenge().prompt());

    // ── 1. Live validation ───────────────────────────────────────────
    println!("\n=== Live validation ===");
    for (field, value) in [
        (Field::ClientName, "Jo"),
        (Field::Phone, "6001234"),
        (Field::Identifier, "B1234567A"),
    ] {
        for e in session.set_field(field, value) {
            println!("  {e}");
        }
    }
    // Changing the identifier type re-checks the identifier
    let errors = session.set_identifier_type(IdentifierType::Cif);
    println!("  switching to CIF -> {} errors", errors.len());

    // ── 2. Gate refuses an incomplete document ───────────────────────
    println!("\n=== Submission gate ===");
    if let Err(e) = session.begin_submission() {
        for v in e.validation_errors() {
            println!("  - {v}");
        }
    }

    // ── 3. Complete the form and submit ──────────────────────────────
    println!("\n=== Submit ===");
    let answer = session.challenge().expected().to_string();
    for (field, value) in [
        (Field::InvoiceNumber, "1001"),
        (Field::ClientName, "Joan Vives"),
        (Field::Address, "Carrer Major 1"),
        (Field::Province, "Barcelona"),
        (Field::City, "Sabadell"),
        (Field::Phone, "600123456"),
        (Field::Email, "joan@vives.cat"),
        (Field::Challenge, answer.as_str()),
    ] {
        session.set_field(field, value);
    }
    session
        .add_line(LineDraft::new("Filtro aceite", dec!(2), dec!(10.00), 21))
        .expect("line should be valid");
    session
        .add_line(LineDraft::new("Mano de obra", dec!(1), dec!(50.00), 10))
        .expect("line should be valid");

    let document = session
        .begin_submission()
        .expect("document should pass the gate")
        .expect("nothing in flight");
    println!("  total: {}", document.totals.rounded().grand_total);

    // No backend yet: the transport is unavailable
    let now = Instant::now();
    let report = session.complete_submission(
        SubmissionOutcome::TransportUnavailable("endpoint not configured".into()),
        now,
    );
    println!("  report: {report:?}");

    session.poll(now + SUCCESS_DISPLAY_DELAY);
    println!(
        "  after reset: phase {:?}, lines {}",
        session.phase(),
        session.lines().len()
    );
}
