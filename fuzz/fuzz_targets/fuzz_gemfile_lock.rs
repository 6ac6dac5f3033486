#![no_main]

use libfuzzer_sys::fuzz_target;
use manifest_libs::parsers::Parser;
use manifest_libs::parsers::ruby::GemfileLockParser;
use std::panic::AssertUnwindSafe;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let parser = GemfileLockParser::new();

        let result = std::panic::catch_unwind(AssertUnwindSafe(|| parser.parse(content)));

        if let Ok(Ok(libs)) = result {
            let lines: Vec<&str> = content.lines().collect();
            for lib in &libs {
                let Some(name) = lib.name.as_str() else {
                    panic!("spec names are always strings");
                };
                assert!(
                    lines.iter().any(|line| line.contains(name)),
                    "name must come from a line of the lockfile"
                );
            }
        }
    }
});
