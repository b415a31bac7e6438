#![no_main]
use libfuzzer_sys::fuzz_target;
use netfold::{convert, ListTags};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let tags: ListTags = ["addresses", "routes"].into_iter().collect();
        let _ = convert(s, &tags);
    }
});
