//! Invoice submission to the backend endpoint.
//!
//! The backend is an external collaborator: it accepts a document and
//! answers success or failure. Its response body is ignored.
//!
//! # Example
//!
//! ```ignore
//! use factura::core::*;
//! use factura::submit::*;
//!
//! let submitter = HttpSubmitter::new(EndpointConfig::from_env()?)?;
//! let mut session = FormSession::new();
//! // ... fill the form, add lines ...
//! if let Some(report) = submit_session(&mut session, &submitter).await? {
//!     println!("{report:?}");
//! }
//! ```

mod config;
mod http;

use std::future::Future;
use std::time::Instant;

use crate::core::{
    FacturaError, FormSession, InvoiceDocument, SubmissionOutcome, SubmissionReport,
};

pub use config::{DEFAULT_ENDPOINT_URL, DEFAULT_TIMEOUT_SECS, EndpointConfig};
pub use http::HttpSubmitter;

/// Something that can deliver an invoice document to the backend.
pub trait Submitter {
    fn submit(
        &self,
        document: &InvoiceDocument,
    ) -> impl Future<Output = SubmissionOutcome> + Send;
}

/// Run one full submission cycle for a session.
///
/// Returns `Ok(None)` if a submission was already in flight, and
/// `Err(FacturaError::Refused)` if the document gate failed.
///
/// The session stays mutably borrowed across the request, so no other input
/// reaches it meanwhile. Callers that keep handling edits or repeated clicks
/// while the request runs should call [`FormSession::begin_submission`],
/// send the document themselves, and finish with
/// [`FormSession::complete_submission`].
pub async fn submit_session<S: Submitter>(
    session: &mut FormSession,
    submitter: &S,
) -> Result<Option<SubmissionReport>, FacturaError> {
    let Some(document) = session.begin_submission()? else {
        return Ok(None);
    };
    let outcome = submitter.submit(&document).await;
    Ok(session.complete_submission(outcome, Instant::now()))
}
