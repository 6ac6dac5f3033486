#![no_main]

use libfuzzer_sys::fuzz_target;
use manifest_libs::file_types::ConfigFormat;
use manifest_libs::processor::ConfigFile;
use manifest_libs::validation::{MAX_NAME_LENGTH, MAX_VERSION_LENGTH};
use std::panic::AssertUnwindSafe;

const LINE_FORMATS: [(ConfigFormat, &str); 7] = [
    (ConfigFormat::CConanPy, "conanfile.py"),
    (ConfigFormat::CConanTxt, "conanfile.txt"),
    (ConfigFormat::GoModules, "go.mod"),
    (ConfigFormat::JavaGradle, "build.gradle"),
    (ConfigFormat::KotlinGradle, "build.gradle.kts"),
    (ConfigFormat::PythonPip, "requirements.txt"),
    (ConfigFormat::PythonPoetry, "pyproject.toml"),
];

fuzz_target!(|data: &[u8]| {
    for (format, path) in LINE_FORMATS {
        let result =
            std::panic::catch_unwind(AssertUnwindSafe(|| ConfigFile::new(format, path, data).parse()));

        let outcome = result.expect("parser must not panic");
        for lib in outcome.libs() {
            assert!(!lib.name.is_empty(), "name must not be empty");
            assert!(
                lib.name.chars().count() <= MAX_NAME_LENGTH,
                "name must be within length limit"
            );
            assert!(
                lib.version
                    .as_ref()
                    .is_none_or(|v| !v.is_empty() && v.chars().count() <= MAX_VERSION_LENGTH),
                "version must be non-empty and within length limit"
            );
        }
    }
});
