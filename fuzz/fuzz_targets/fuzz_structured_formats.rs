#![no_main]

use libfuzzer_sys::fuzz_target;
use manifest_libs::file_types::ConfigFormat;
use manifest_libs::processor::ConfigFile;
use manifest_libs::validation::{MAX_NAME_LENGTH, MAX_VERSION_LENGTH};
use std::panic::AssertUnwindSafe;

const STRUCTURED_FORMATS: [(ConfigFormat, &str); 10] = [
    (ConfigFormat::CppVcpkg, "vcpkg.json"),
    (ConfigFormat::CsharpNuget, "App.csproj"),
    (ConfigFormat::JavaMaven, "pom.xml"),
    (ConfigFormat::JavascriptNpmLock, "package-lock.json"),
    (ConfigFormat::JavascriptNpm, "package.json"),
    (ConfigFormat::PhpComposerLock, "composer.lock"),
    (ConfigFormat::PhpComposer, "composer.json"),
    (ConfigFormat::PythonConda, "environment.yml"),
    (ConfigFormat::PythonPoetryLock, "poetry.lock"),
    (ConfigFormat::RubyGemsLock, "Gemfile.lock"),
];

fuzz_target!(|data: &[u8]| {
    for (format, path) in STRUCTURED_FORMATS {
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
