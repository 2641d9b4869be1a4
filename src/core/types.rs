use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// IVA bracket. Only the three legal Spanish rates are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum VatRate {
    /// 21 %, tipo general.
    #[default]
    General,
    /// 10 %, tipo reducido.
    Reduced,
    /// 4 %, tipo superreducido.
    SuperReduced,
}

impl VatRate {
    /// All brackets, highest rate first.
    pub const ALL: [VatRate; 3] = [Self::General, Self::Reduced, Self::SuperReduced];

    /// Rate as a whole percentage.
    pub fn percent(&self) -> u8 {
        match self {
            Self::General => 21,
            Self::Reduced => 10,
            Self::SuperReduced => 4,
        }
    }

    /// Rate as a decimal percentage (e.g. `21`).
    pub fn as_decimal(&self) -> Decimal {
        Decimal::from(self.percent())
    }

    /// Parse from a whole percentage.
    pub fn from_percent(percent: u32) -> Option<Self> {
        match percent {
            21 => Some(Self::General),
            10 => Some(Self::Reduced),
            4 => Some(Self::SuperReduced),
            _ => None,
        }
    }
}

impl From<VatRate> for u8 {
    fn from(rate: VatRate) -> u8 {
        rate.percent()
    }
}

impl TryFrom<u8> for VatRate {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_percent(u32::from(value))
            .ok_or_else(|| format!("unsupported IVA rate {value}% (expected 21, 10 or 4)"))
    }
}

/// Kind of Spanish tax identifier supplied by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IdentifierType {
    /// Número de Identificación Fiscal (individuals): 8 digits + control letter.
    #[default]
    #[serde(rename = "NIF")]
    Nif,
    /// Código de Identificación Fiscal (companies): letter + 7 digits + control character.
    #[serde(rename = "CIF")]
    Cif,
}

impl IdentifierType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Nif => "NIF",
            Self::Cif => "CIF",
        }
    }

    /// Parse from "NIF" / "CIF" (case-insensitive, surrounding whitespace ignored).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "NIF" => Some(Self::Nif),
            "CIF" => Some(Self::Cif),
            _ => None,
        }
    }
}

/// Raw "add line" input, before range checks.
#[derive(Debug, Clone, PartialEq)]
pub struct LineDraft {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    /// Whole percentage; must be one of 21, 10, 4.
    pub tax_rate: u32,
}

impl LineDraft {
    pub fn new(
        description: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
        tax_rate: u32,
    ) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
            tax_rate,
        }
    }
}

impl Default for LineDraft {
    /// Mirrors a freshly reset line form: one unit, no price, 21 %.
    fn default() -> Self {
        Self {
            description: String::new(),
            quantity: Decimal::ONE,
            unit_price: Decimal::ZERO,
            tax_rate: 21,
        }
    }
}

/// An accepted invoice line with its derived amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Sequential id, never reused within a ledger.
    pub id: u64,
    #[serde(rename = "articulo")]
    pub description: String,
    #[serde(rename = "cantidad", with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    #[serde(rename = "precio", with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(rename = "tipoIva")]
    pub tax_rate: VatRate,
    /// quantity × unit price.
    #[serde(with = "rust_decimal::serde::float")]
    pub base: Decimal,
    /// base × rate / 100.
    #[serde(rename = "iva", with = "rust_decimal::serde::float")]
    pub tax_amount: Decimal,
    /// base + tax.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

/// Taxable base and IVA for one bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RateSubtotal {
    /// Base imponible.
    pub base: Decimal,
    /// Cuota de IVA.
    pub tax: Decimal,
}

impl RateSubtotal {
    pub fn total(&self) -> Decimal {
        self.base + self.tax
    }
}

/// Per-bracket subtotals and the grand total of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "TotalsWire", into = "TotalsWire")]
pub struct Totals {
    /// 21 % bucket.
    pub general: RateSubtotal,
    /// 10 % bucket.
    pub reduced: RateSubtotal,
    /// 4 % bucket.
    pub super_reduced: RateSubtotal,
    /// Sum of all six subtotal components.
    pub grand_total: Decimal,
}

impl Totals {
    pub fn bucket(&self, rate: VatRate) -> &RateSubtotal {
        match rate {
            VatRate::General => &self.general,
            VatRate::Reduced => &self.reduced,
            VatRate::SuperReduced => &self.super_reduced,
        }
    }

    pub(crate) fn bucket_mut(&mut self, rate: VatRate) -> &mut RateSubtotal {
        match rate {
            VatRate::General => &mut self.general,
            VatRate::Reduced => &mut self.reduced,
            VatRate::SuperReduced => &mut self.super_reduced,
        }
    }

    /// Copy rounded to cents, half away from zero (commercial rounding).
    pub fn rounded(&self) -> Totals {
        let round = |v: Decimal| {
            v.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
        };
        let sub = |s: &RateSubtotal| RateSubtotal {
            base: round(s.base),
            tax: round(s.tax),
        };
        Totals {
            general: sub(&self.general),
            reduced: sub(&self.reduced),
            super_reduced: sub(&self.super_reduced),
            grand_total: round(self.grand_total),
        }
    }
}

/// Flat wire shape expected by the backend.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TotalsWire {
    #[serde(with = "rust_decimal::serde::float")]
    base_imponible21: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    iva21: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    base_imponible10: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    iva10: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    base_imponible4: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    iva4: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    total_factura: Decimal,
}

impl From<Totals> for TotalsWire {
    fn from(t: Totals) -> Self {
        Self {
            base_imponible21: t.general.base,
            iva21: t.general.tax,
            base_imponible10: t.reduced.base,
            iva10: t.reduced.tax,
            base_imponible4: t.super_reduced.base,
            iva4: t.super_reduced.tax,
            total_factura: t.grand_total,
        }
    }
}

impl From<TotalsWire> for Totals {
    fn from(w: TotalsWire) -> Self {
        Self {
            general: RateSubtotal {
                base: w.base_imponible21,
                tax: w.iva21,
            },
            reduced: RateSubtotal {
                base: w.base_imponible10,
                tax: w.iva10,
            },
            super_reduced: RateSubtotal {
                base: w.base_imponible4,
                tax: w.iva4,
            },
            grand_total: w.total_factura,
        }
    }
}

/// Raw header fields of the entry form, as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceForm {
    /// Digits only.
    pub invoice_number: String,
    /// Issue date; defaults to the day the form is (re)initialized.
    pub date: NaiveDate,
    pub client_name: String,
    pub address: String,
    pub province: String,
    pub city: String,
    pub identifier_type: IdentifierType,
    pub identifier: String,
    /// Nine digits.
    pub phone: String,
    pub email: String,
    /// Answer to the arithmetic challenge. Never part of the document.
    pub challenge_answer: String,
}

impl InvoiceForm {
    /// Empty form dated `today`, identifier type NIF.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            invoice_number: String::new(),
            date: today,
            client_name: String::new(),
            address: String::new(),
            province: String::new(),
            city: String::new(),
            identifier_type: IdentifierType::default(),
            identifier: String::new(),
            phone: String::new(),
            email: String::new(),
            challenge_answer: String::new(),
        }
    }
}

impl Default for InvoiceForm {
    fn default() -> Self {
        Self::new(today())
    }
}

/// Current local calendar date.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// The assembled invoice as sent to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDocument {
    #[serde(rename = "numeroFactura")]
    pub invoice_number: String,
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    #[serde(rename = "nombreCliente")]
    pub client_name: String,
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "provincia")]
    pub province: String,
    #[serde(rename = "ciudad")]
    pub city: String,
    #[serde(rename = "tipoDocumento")]
    pub identifier_type: IdentifierType,
    #[serde(rename = "numeroDocumento")]
    pub identifier: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    pub email: String,
    #[serde(rename = "lineas")]
    pub lines: Vec<LineItem>,
    #[serde(flatten)]
    pub totals: Totals,
}

impl InvoiceDocument {
    /// Assemble a document from the form and the current lines.
    ///
    /// Does not validate; see [`crate::core::validate_document`].
    pub fn assemble(form: &InvoiceForm, lines: &[LineItem], totals: Totals) -> Self {
        Self {
            invoice_number: form.invoice_number.trim().to_string(),
            date: form.date,
            client_name: form.client_name.trim().to_string(),
            address: form.address.trim().to_string(),
            province: form.province.trim().to_string(),
            city: form.city.trim().to_string(),
            identifier_type: form.identifier_type,
            identifier: form.identifier.trim().to_ascii_uppercase(),
            phone: form.phone.trim().to_string(),
            email: form.email.trim().to_string(),
            lines: lines.to_vec(),
            totals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn vat_rate_roundtrips_percent() {
        for rate in VatRate::ALL {
            assert_eq!(VatRate::from_percent(u32::from(rate.percent())), Some(rate));
        }
        assert_eq!(VatRate::from_percent(7), None);
        assert_eq!(VatRate::from_percent(0), None);
    }

    #[test]
    fn vat_rate_try_from_rejects_unknown() {
        assert!(VatRate::try_from(19u8).is_err());
        assert_eq!(VatRate::try_from(4u8), Ok(VatRate::SuperReduced));
    }

    #[test]
    fn identifier_type_codes() {
        assert_eq!(IdentifierType::from_code(" cif "), Some(IdentifierType::Cif));
        assert_eq!(IdentifierType::from_code("NIF"), Some(IdentifierType::Nif));
        assert_eq!(IdentifierType::from_code("NIE"), None);
        assert_eq!(IdentifierType::default(), IdentifierType::Nif);
    }

    #[test]
    fn line_draft_defaults() {
        let d = LineDraft::default();
        assert_eq!(d.quantity, dec!(1));
        assert_eq!(d.unit_price, dec!(0));
        assert_eq!(d.tax_rate, 21);
        assert!(d.description.is_empty());
    }

    #[test]
    fn totals_rounding_half_up() {
        let t = Totals {
            general: RateSubtotal {
                base: dec!(10.005),
                tax: dec!(2.10105),
            },
            grand_total: dec!(12.10605),
            ..Totals::default()
        };
        let r = t.rounded();
        assert_eq!(r.general.base, dec!(10.01));
        assert_eq!(r.general.tax, dec!(2.10));
        assert_eq!(r.grand_total, dec!(12.11));
    }

    #[test]
    fn form_defaults_to_nif() {
        let day = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        let form = InvoiceForm::new(day);
        assert_eq!(form.date, day);
        assert_eq!(form.identifier_type, IdentifierType::Nif);
        assert!(form.invoice_number.is_empty());
    }
}
