use factura::core::*;
use rust_decimal_macros::dec;

fn main() {
    // Lines of a typical workshop job
    let mut ledger = LineLedger::new();
    for draft in [
        LineDraft::new("Filtro aceite", dec!(2), dec!(10.00), 21),
        LineDraft::new("Mano de obra", dec!(1), dec!(50.00), 10),
        LineDraft::new("Manual de mantenimiento", dec!(1), dec!(18.50), 4),
    ] {
        ledger.add_line(draft).expect("line should be valid");
    }

    // A rejected line leaves the ledger untouched
    if let Err(e) = ledger.add_line(LineDraft::new("Descuento", dec!(1), dec!(-5), 21)) {
        println!("Rejected: {e}");
    }

    println!("---");
    for line in ledger.lines() {
        println!(
            "  #{} {} x {} @ {} ({}%) = {}",
            line.id,
            line.quantity,
            line.description,
            line.unit_price,
            line.tax_rate.percent(),
            line.total
        );
    }

    let totals = ledger.totals().rounded();
    println!("---");
    for rate in VatRate::ALL {
        let bucket = totals.bucket(rate);
        println!(
            "Base {:>2}%: {:>8}   IVA: {:>7}",
            rate.percent(),
            bucket.base,
            bucket.tax
        );
    }
    println!("Total:     {:>8} EUR", totals.grand_total);

    // Identifier checks
    println!("---");
    for (kind, value) in [
        (IdentifierType::Nif, "12345678Z"),
        (IdentifierType::Nif, "12345678A"),
        (IdentifierType::Cif, "B1234567A"),
        (IdentifierType::Cif, "B123456789"),
    ] {
        match validate_identifier(kind, value) {
            Ok(()) => println!("{} {value}: ok", kind.code()),
            Err(e) => println!("{} {value}: {e}", kind.code()),
        }
    }
}
