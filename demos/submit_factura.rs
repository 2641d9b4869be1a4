use factura::core::*;
use factura::submit::*;
use rust_decimal_macros::dec;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // FACTURA_ENDPOINT_URL / FACTURA_ENDPOINT_TIMEOUT_SECS
    let config = EndpointConfig::from_env()?;
    println!("Endpoint: {} (timeout {:?})", config.url, config.timeout());
    let submitter = HttpSubmitter::new(config)?;

    let mut session = FormSession::new();
    let answer = session.challenge().expected().to_string();
    for (field, value) in [
        (Field::InvoiceNumber, "1001"),
        (Field::ClientName, "Transportes Pla SL"),
        (Field::Address, "Polígon Industrial 4"),
        (Field::Province, "Lleida"),
        (Field::City, "Balaguer"),
        (Field::IdentifierType, "CIF"),
        (Field::Identifier, "B2512345C"),
        (Field::Phone, "973444555"),
        (Field::Email, "admin@transportespla.es"),
        (Field::Challenge, answer.as_str()),
    ] {
        session.set_field(field, value);
    }
    session.add_line(LineDraft::new("Cambio de neumáticos", dec!(4), dec!(90), 21))?;

    match submit_session(&mut session, &submitter).await? {
        Some(SubmissionReport::Succeeded { notice: None }) => println!("Invoice accepted"),
        Some(SubmissionReport::Succeeded { notice: Some(n) }) => println!("Invoice saved: {n}"),
        Some(SubmissionReport::Failed { reason }) => println!("Submission failed: {reason}"),
        None => println!("A submission was already in flight"),
    }
    Ok(())
}
