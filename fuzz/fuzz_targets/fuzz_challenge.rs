#![no_main]

use factura::core::Challenge;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    if let Ok(answer) = std::str::from_utf8(&data[2..]) {
        let _ = Challenge::new(data[0], data[1]).check(answer);
    }
});
