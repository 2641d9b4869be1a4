use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use factura::core::*;

const RATES: [u32; 3] = [21, 10, 4];

fn ledger_with(lines: usize) -> LineLedger {
    let mut ledger = LineLedger::new();
    for i in 0..lines {
        ledger
            .add_line(LineDraft::new(
                format!("Recambio {i}"),
                Decimal::from(1 + i % 5),
                dec!(12.35),
                RATES[i % 3],
            ))
            .unwrap();
    }
    ledger
}

fn bench_recompute(c: &mut Criterion) {
    let mut small = ledger_with(10);
    c.bench_function("recompute_10_lines", |b| {
        b.iter(|| {
            small.recompute_totals();
            black_box(small.totals())
        })
    });

    let mut big = ledger_with(1000);
    c.bench_function("recompute_1000_lines", |b| {
        b.iter(|| {
            big.recompute_totals();
            black_box(big.totals())
        })
    });
}

fn bench_add_remove(c: &mut Criterion) {
    c.bench_function("add_then_remove_line", |b| {
        let mut ledger = ledger_with(100);
        b.iter(|| {
            let line = ledger
                .add_line(LineDraft::new("Aceite 5W30", dec!(1), dec!(38.90), 21))
                .unwrap();
            black_box(ledger.remove_line(line.id))
        })
    });
}

fn bench_validation(c: &mut Criterion) {
    c.bench_function("validate_nif", |b| {
        b.iter(|| validate_nif(black_box("12345678Z")))
    });

    let form = InvoiceForm {
        invoice_number: "1".into(),
        client_name: "Cliente".into(),
        address: "Calle 1".into(),
        province: "Madrid".into(),
        city: "Madrid".into(),
        identifier: "12345678Z".into(),
        phone: "600000000".into(),
        email: "c@example.com".into(),
        challenge_answer: "8".into(),
        ..InvoiceForm::default()
    };
    let challenge = Challenge::new(3, 5);
    let ledger = ledger_with(10);
    c.bench_function("gate_document_10_lines", |b| {
        b.iter(|| gate_document(black_box(&form), &challenge, &ledger).unwrap())
    });
}

criterion_group!(benches, bench_recompute, bench_add_remove, bench_validation);
criterion_main!(benches);
