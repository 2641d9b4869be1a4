//! # factura
//!
//! Invoice entry core for a small Spanish workshop: line items, IVA
//! subtotals across the three legal brackets (21 %, 10 %, 4 %), NIF/CIF
//! checks, a human-verification challenge, and the submission flow of the
//! entry form.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use factura::core::*;
//! use rust_decimal_macros::dec;
//!
//! let mut ledger = LineLedger::new();
//! ledger.add_line(LineDraft::new("Filtro aceite", dec!(2), dec!(10.00), 21)).unwrap();
//! ledger.add_line(LineDraft::new("Mano de obra", dec!(1), dec!(50.00), 10)).unwrap();
//!
//! let totals = ledger.totals();
//! assert_eq!(totals.general.base, dec!(20.00));
//! assert_eq!(totals.general.tax, dec!(4.20));
//! assert_eq!(totals.grand_total, dec!(79.20));
//!
//! assert!(validate_identifier(IdentifierType::Nif, "12345678Z").is_ok());
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Types, line ledger, validation, form session, views |
//! | `submit` | HTTP submission client and endpoint configuration |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "submit")]
pub mod submit;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
