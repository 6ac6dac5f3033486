//! manifest-libs - dependency manifest extraction
//!
//! This crate recognizes dependency manifests and lockfiles from a range of
//! package managers (Conan, vcpkg, NuGet, Go modules, Gradle, Maven, npm,
//! Composer, Conda, pip, Poetry, Bundler) and extracts validated
//! `{name, version}` library records from them, one file at a time.

pub mod config;
pub mod error;
pub mod file_types;
pub mod parsers;
pub mod processor;
pub mod registry;
pub mod reports;
pub mod scan;
pub mod utils;
pub mod validation;
