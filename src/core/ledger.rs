use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::{ErrorKind, FacturaError, ValidationError};
use super::types::*;

/// Smallest accepted unit price.
pub const MIN_UNIT_PRICE: Decimal = dec!(0.01);

/// Smallest accepted quantity.
pub const MIN_QUANTITY: Decimal = Decimal::ONE;

/// Ordered set of invoice lines with per-bracket subtotals.
///
/// Totals are rebuilt from scratch on every change, never patched.
///
/// ```
/// use factura::core::*;
/// use rust_decimal_macros::dec;
///
/// let mut ledger = LineLedger::new();
/// let line = ledger.add_line(LineDraft::new("Neumático", dec!(4), dec!(85), 21)).unwrap();
/// assert_eq!(line.total, dec!(411.40));
/// ledger.remove_line(line.id);
/// assert!(ledger.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct LineLedger {
    lines: Vec<LineItem>,
    next_id: u64,
    totals: Totals,
}

impl Default for LineLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LineLedger {
    /// Empty ledger; the first line gets id 1.
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            next_id: 1,
            totals: Totals::default(),
        }
    }

    /// Validate a draft, append it with the next id, and recompute totals.
    ///
    /// On error the ledger is unchanged and no id is consumed. Amounts too
    /// large for a `Decimal`, on the line or in the running totals, are
    /// rejected as `LineInputInvalid`.
    pub fn add_line(&mut self, draft: LineDraft) -> Result<LineItem, FacturaError> {
        let rate = check_draft(&draft).map_err(FacturaError::LineRejected)?;

        let line = compute_line(self.next_id, draft, rate)
            .ok_or_else(|| FacturaError::LineRejected(vec![amount_overflow()]))?;
        let totals = fold_totals(self.lines.iter().chain(std::iter::once(&line)))
            .ok_or_else(|| FacturaError::LineRejected(vec![amount_overflow()]))?;

        self.next_id += 1;
        self.lines.push(line.clone());
        self.set_totals(totals);
        Ok(line)
    }

    /// Remove the line with the given id. Absent ids are a no-op.
    ///
    /// Returns the removed line, if any.
    pub fn remove_line(&mut self, id: u64) -> Option<LineItem> {
        let pos = self.lines.iter().position(|l| l.id == id);
        let removed = pos.map(|i| self.lines.remove(i));
        self.recompute_totals();
        removed
    }

    /// Rebuild all subtotals and the grand total from the current lines.
    pub fn recompute_totals(&mut self) {
        // Every accepted line set was summed once in add_line; a subset of
        // non-negative amounts stays in range.
        if let Some(totals) = fold_totals(self.lines.iter()) {
            self.set_totals(totals);
        }
    }

    fn set_totals(&mut self, totals: Totals) {
        tracing::debug!(
            lines = self.lines.len(),
            grand_total = %totals.grand_total,
            "recomputed invoice totals"
        );
        self.totals = totals;
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn get(&self, id: u64) -> Option<&LineItem> {
        self.lines.iter().find(|l| l.id == id)
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Id the next accepted line will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }
}

fn compute_line(id: u64, draft: LineDraft, rate: VatRate) -> Option<LineItem> {
    let base = draft.quantity.checked_mul(draft.unit_price)?;
    let tax_amount = base.checked_mul(rate.as_decimal() / dec!(100))?;
    let total = base.checked_add(tax_amount)?;
    Some(LineItem {
        id,
        description: draft.description.trim().to_string(),
        quantity: draft.quantity,
        unit_price: draft.unit_price,
        tax_rate: rate,
        base,
        tax_amount,
        total,
    })
}

/// Bucket lines by rate and sum the grand total. `None` on overflow.
fn fold_totals<'a>(lines: impl Iterator<Item = &'a LineItem>) -> Option<Totals> {
    let mut totals = Totals::default();
    for line in lines {
        let bucket = totals.bucket_mut(line.tax_rate);
        bucket.base = bucket.base.checked_add(line.base)?;
        bucket.tax = bucket.tax.checked_add(line.tax_amount)?;
    }
    let mut grand_total = Decimal::ZERO;
    for rate in VatRate::ALL {
        let bucket = totals.bucket(rate);
        grand_total = grand_total
            .checked_add(bucket.base)?
            .checked_add(bucket.tax)?;
    }
    totals.grand_total = grand_total;
    Some(totals)
}

fn amount_overflow() -> ValidationError {
    ValidationError::new(
        "cantidad",
        "quantity times unit price is too large",
        ErrorKind::LineInputInvalid,
    )
}

/// Range checks for a line draft. Returns all problems, not just the first.
pub fn check_draft(draft: &LineDraft) -> Result<VatRate, Vec<ValidationError>> {
    let mut errors = Vec::new();

    if draft.description.trim().is_empty() {
        errors.push(ValidationError::new(
            "articulo",
            "description must not be empty",
            ErrorKind::LineInputInvalid,
        ));
    }

    if draft.quantity < MIN_QUANTITY {
        errors.push(ValidationError::new(
            "cantidad",
            format!("quantity must be at least {MIN_QUANTITY}, got {}", draft.quantity),
            ErrorKind::LineInputInvalid,
        ));
    }

    if draft.unit_price < MIN_UNIT_PRICE {
        errors.push(ValidationError::new(
            "precio",
            format!("unit price must be at least {MIN_UNIT_PRICE}, got {}", draft.unit_price),
            ErrorKind::LineInputInvalid,
        ));
    }

    let rate = VatRate::from_percent(draft.tax_rate);
    if rate.is_none() {
        errors.push(ValidationError::new(
            "tipo_iva",
            format!("IVA rate must be 21, 10 or 4, got {}", draft.tax_rate),
            ErrorKind::LineInputInvalid,
        ));
    }

    match rate {
        Some(rate) if errors.is_empty() => Ok(rate),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(desc: &str, qty: Decimal, price: Decimal, rate: u32) -> LineDraft {
        LineDraft::new(desc, qty, price, rate)
    }

    #[test]
    fn line_amounts() {
        let mut ledger = LineLedger::new();
        let line = ledger
            .add_line(draft("Filtro aceite", dec!(2), dec!(10.00), 21))
            .unwrap();
        assert_eq!(line.id, 1);
        assert_eq!(line.base, dec!(20.00));
        assert_eq!(line.tax_amount, dec!(4.20));
        assert_eq!(line.total, dec!(24.20));
    }

    #[test]
    fn ids_are_never_reused() {
        let mut ledger = LineLedger::new();
        let a = ledger.add_line(draft("A", dec!(1), dec!(1), 21)).unwrap();
        let b = ledger.add_line(draft("B", dec!(1), dec!(1), 10)).unwrap();
        ledger.remove_line(b.id);
        let c = ledger.add_line(draft("C", dec!(1), dec!(1), 4)).unwrap();
        assert_eq!((a.id, b.id, c.id), (1, 2, 3));
        let ids: Vec<u64> = ledger.lines().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn rejected_line_does_not_consume_id() {
        let mut ledger = LineLedger::new();
        assert!(ledger.add_line(draft("", dec!(1), dec!(1), 21)).is_err());
        assert_eq!(ledger.next_id(), 1);
        assert!(ledger.is_empty());
    }

    #[test]
    fn reject_quantity_below_one() {
        let mut ledger = LineLedger::new();
        let err = ledger.add_line(draft("X", dec!(0.5), dec!(1), 21)).unwrap_err();
        assert!(err.has_kind(ErrorKind::LineInputInvalid));
        assert_eq!(err.validation_errors()[0].field, "cantidad");
    }

    #[test]
    fn reject_price_below_one_cent() {
        let mut ledger = LineLedger::new();
        assert!(ledger.add_line(draft("X", dec!(1), dec!(0.009), 21)).is_err());
        assert!(ledger.add_line(draft("X", dec!(1), dec!(0), 21)).is_err());
        assert!(ledger.add_line(draft("X", dec!(1), dec!(0.01), 21)).is_ok());
    }

    #[test]
    fn reject_unknown_rate() {
        let mut ledger = LineLedger::new();
        let err = ledger.add_line(draft("X", dec!(1), dec!(1), 19)).unwrap_err();
        assert_eq!(err.validation_errors()[0].field, "tipo_iva");
    }

    #[test]
    fn reports_all_draft_problems() {
        let errors = check_draft(&draft(" ", dec!(0), dec!(0), 7)).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().all(|e| e.kind == ErrorKind::LineInputInvalid));
    }

    #[test]
    fn description_is_trimmed() {
        let mut ledger = LineLedger::new();
        let line = ledger.add_line(draft("  Aceite  ", dec!(1), dec!(1), 21)).unwrap();
        assert_eq!(line.description, "Aceite");
    }

    #[test]
    fn remove_absent_id_is_noop() {
        let mut ledger = LineLedger::new();
        ledger.add_line(draft("A", dec!(3), dec!(7.5), 10)).unwrap();
        let before = ledger.totals();
        assert!(ledger.remove_line(99).is_none());
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.totals(), before);
    }

    #[test]
    fn buckets_by_rate() {
        let mut ledger = LineLedger::new();
        ledger.add_line(draft("A", dec!(1), dec!(100), 21)).unwrap();
        ledger.add_line(draft("B", dec!(1), dec!(100), 10)).unwrap();
        ledger.add_line(draft("C", dec!(1), dec!(100), 4)).unwrap();
        ledger.add_line(draft("D", dec!(2), dec!(50), 21)).unwrap();
        let t = ledger.totals();
        assert_eq!(t.general.base, dec!(200));
        assert_eq!(t.general.tax, dec!(42));
        assert_eq!(t.reduced.base, dec!(100));
        assert_eq!(t.reduced.tax, dec!(10));
        assert_eq!(t.super_reduced.base, dec!(100));
        assert_eq!(t.super_reduced.tax, dec!(4));
        assert_eq!(t.grand_total, dec!(456));
    }

    #[test]
    fn huge_amounts_are_rejected_not_panicking() {
        let mut ledger = LineLedger::new();
        ledger.add_line(draft("A", dec!(2), dec!(10), 21)).unwrap();
        let before = ledger.totals();

        let huge = dec!(1_000_000_000_000_000_000);
        let err = ledger.add_line(draft("X", huge, huge, 21)).unwrap_err();
        assert!(err.has_kind(ErrorKind::LineInputInvalid));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.next_id(), 2);
        assert_eq!(ledger.totals(), before);
    }

    #[test]
    fn running_total_overflow_is_rejected() {
        let mut ledger = LineLedger::new();
        // 3e28 per line: two fit under Decimal::MAX, a third does not.
        let qty = dec!(300_000_000_000_000);
        let price = dec!(100_000_000_000_000);
        for _ in 0..2 {
            ledger.add_line(draft("A", qty, price, 21)).unwrap();
        }
        let before = ledger.totals();
        let err = ledger.add_line(draft("B", qty, price, 21)).unwrap_err();
        assert!(err.has_kind(ErrorKind::LineInputInvalid));
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.totals(), before);
    }

    #[test]
    fn removing_everything_zeroes_totals() {
        let mut ledger = LineLedger::new();
        let a = ledger.add_line(draft("A", dec!(1), dec!(9.99), 4)).unwrap();
        ledger.remove_line(a.id);
        assert_eq!(ledger.totals(), Totals::default());
    }
}
