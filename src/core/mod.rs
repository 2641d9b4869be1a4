//! Core invoice types, line ledger, validation, and the form session.
//!
//! This module holds everything that runs without a network: the IVA
//! accumulator, the field and document validators, the challenge, and the
//! entry-flow state machine.

mod challenge;
mod error;
mod identifier;
mod ledger;
mod session;
mod types;
mod validation;
pub mod views;

pub use challenge::*;
pub use error::*;
pub use identifier::*;
pub use ledger::*;
pub use session::*;
pub use types::*;
pub use validation::*;
