//! Per-file extraction lifecycle
//!
//! A [`ConfigFile`] holds one manifest's sanitized content. [`ConfigFile::parse`]
//! runs extraction and validation and always returns a [`ParseOutcome`]: errors
//! are logged and captured, never raised to the caller.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{ParseError, Result};
use crate::file_types::ConfigFormat;
use crate::parsers::{Lib, RawLib, RawValue};
use crate::validation::{sanitize_content, sanitize_version, validate_name, validate_version};

/// One manifest file awaiting extraction
#[derive(Debug, Clone)]
pub struct ConfigFile {
    format: ConfigFormat,
    path: String,
    content: String,
    project_id: Option<String>,
}

impl ConfigFile {
    /// Wrap raw file bytes. The bytes are sanitized immediately.
    pub fn new(format: ConfigFormat, path: impl Into<String>, raw: &[u8]) -> Self {
        Self {
            format,
            path: path.into(),
            content: sanitize_content(raw),
            project_id: None,
        }
    }

    /// Attach the owning project, used only for log attribution.
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn format(&self) -> ConfigFormat {
        self.format
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Extract and validate the file's libraries.
    pub fn parse(&self) -> ParseOutcome {
        let result = self.extract_libs();

        match &result {
            Ok(libs) => debug!(
                format = %self.format,
                path = %self.path,
                libs = libs.len(),
                "Parsed manifest"
            ),
            Err(err) => warn!(
                format = %self.format,
                error_class = err.kind(),
                message = %err,
                project_id = self.project_id.as_deref().unwrap_or_default(),
                path = %self.path,
                "Failed to parse manifest"
            ),
        }

        ParseOutcome {
            format: self.format,
            path: self.path.clone(),
            result,
        }
    }

    fn extract_libs(&self) -> Result<Vec<Lib>> {
        if self.content.trim().is_empty() {
            return Err(ParseError::FileEmpty);
        }

        let libs = self
            .format
            .extract(&self.content)?
            .into_iter()
            .map(validate_lib)
            .collect::<Result<Vec<_>>>()?;

        if libs.is_empty() {
            return Err(ParseError::UnexpectedFormatOrDependenciesNotPresent);
        }

        Ok(libs)
    }
}

/// Type-check, sanitize and validate one extracted candidate.
pub fn validate_lib(raw: RawLib) -> Result<Lib> {
    let name = match raw.name {
        RawValue::Str(name) => name,
        other => {
            return Err(ParseError::UnexpectedDependencyNameType {
                found: other.type_name(),
            });
        }
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(ParseError::BlankDependencyName);
    }

    let version = match raw.version {
        RawValue::Absent => None,
        RawValue::Str(version) => Some(version),
        RawValue::Int(version) => Some(version.to_string()),
        // Debug formatting keeps the fraction: 1.0 stays "1.0"
        RawValue::Float(version) => Some(format!("{version:?}")),
        RawValue::Other(found) => {
            return Err(ParseError::UnexpectedDependencyVersionType { found });
        }
    };
    let version = version
        .map(|v| sanitize_version(v.trim()))
        .filter(|v| !v.is_empty());

    validate_name(name)?;
    if let Some(version) = &version {
        validate_version(version)?;
    }

    Ok(Lib::new(name, version))
}

/// Result of parsing one manifest file
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    format: ConfigFormat,
    path: String,
    result: Result<Vec<Lib>>,
}

impl ParseOutcome {
    pub fn format(&self) -> ConfigFormat {
        self.format
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// True when at least one library was extracted and every one validated.
    pub fn is_valid(&self) -> bool {
        self.result.is_ok()
    }

    /// Validated libraries in source order; empty for an invalid outcome.
    pub fn libs(&self) -> &[Lib] {
        match &self.result {
            Ok(libs) => libs.as_slice(),
            Err(_) => &[],
        }
    }

    pub fn error(&self) -> Option<&ParseError> {
        self.result.as_ref().err()
    }

    /// Human-readable failure reason naming the file.
    pub fn error_message(&self) -> Option<String> {
        self.error()
            .map(|err| format!("Error while parsing file `{}`: {err}", self.path))
    }

    /// Success payload for downstream storage; `None` for an invalid outcome.
    pub fn payload(&self) -> Option<Payload> {
        let libs = self.result.as_ref().ok()?;
        Some(Payload {
            libs: libs
                .iter()
                .map(|lib| PayloadLib {
                    name: lib.display_name(),
                })
                .collect(),
            file_path: self.path.clone(),
        })
    }
}

/// `{libs: [{name: "zlib (1.2.13)"}, ...], file_path: "conanfile.txt"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payload {
    pub libs: Vec<PayloadLib>,
    pub file_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayloadLib {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LibField;

    fn parse(format: ConfigFormat, path: &str, content: &str) -> ParseOutcome {
        ConfigFile::new(format, path, content.as_bytes()).parse()
    }

    #[test]
    fn test_valid_outcome_and_payload() {
        let outcome = parse(
            ConfigFormat::CConanTxt,
            "conanfile.txt",
            "[requires]\nzlib/1.2.13#revision1\npoco/[>1.0,<1.9]\n",
        );

        assert!(outcome.is_valid());
        assert!(outcome.error().is_none());
        assert!(outcome.error_message().is_none());
        assert_eq!(
            outcome.libs(),
            &[
                Lib::new("zlib", Some("1.2.13".to_string())),
                Lib::new("poco", Some(">1.0,<1.9".to_string())),
            ]
        );

        let payload = outcome.payload().unwrap();
        assert_eq!(payload.file_path, "conanfile.txt");
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            serde_json::json!({
                "libs": [{"name": "zlib (1.2.13)"}, {"name": "poco (>1.0,<1.9)"}],
                "file_path": "conanfile.txt"
            })
        );
    }

    #[test]
    fn test_empty_file_law() {
        for format in ConfigFormat::ALL {
            for content in ["", "   \n\t\n", "\0\0"] {
                let outcome = parse(format, "any/path", content);
                assert_eq!(outcome.error(), Some(&ParseError::FileEmpty), "{format}");
            }
        }
    }

    #[test]
    fn test_zero_dependency_law() {
        let cases = [
            (ConfigFormat::JavascriptNpm, r#"{"name": "app"}"#),
            (ConfigFormat::GoModules, "module example.com/app\n\ngo 1.21\n"),
            (ConfigFormat::CppVcpkg, r#"{"dependencies": []}"#),
            (ConfigFormat::PythonPoetryLock, "[metadata]\nlock-version = \"2.0\"\n"),
            (ConfigFormat::PythonConda, "name: env\n"),
        ];

        for (format, content) in cases {
            let outcome = parse(format, "manifest", content);
            assert_eq!(
                outcome.error(),
                Some(&ParseError::UnexpectedFormatOrDependenciesNotPresent),
                "{format}"
            );
        }
    }

    #[test]
    fn test_idempotent() {
        let file = ConfigFile::new(
            ConfigFormat::PythonPip,
            "requirements.txt",
            b"requests>=2.0,<3.0  # comment\nbad name==1.0\n",
        );
        assert_eq!(file.parse(), file.parse());
    }

    #[test]
    fn test_one_invalid_lib_fails_whole_file() {
        let outcome = parse(
            ConfigFormat::JavascriptNpm,
            "package.json",
            r#"{"dependencies": {"left-pad": "1.3.0", "bad;name": "1.0.0"}}"#,
        );
        assert!(!outcome.is_valid());
        assert!(outcome.libs().is_empty());
        assert!(outcome.payload().is_none());
        assert!(matches!(
            outcome.error(),
            Some(ParseError::StringValidation {
                field: LibField::Name,
                ..
            })
        ));
    }

    #[test]
    fn test_error_message() {
        let outcome = parse(ConfigFormat::JavascriptNpm, "web/package.json", "{not json");
        let message = outcome.error_message().unwrap();
        assert!(message.starts_with("Error while parsing file `web/package.json`: content is not valid JSON"));
        assert_eq!(outcome.error().map(ParseError::kind), Some("DeserializationException"));
    }

    #[test]
    fn test_content_is_sanitized() {
        let file = ConfigFile::new(ConfigFormat::GoModules, "go.mod", b"require a.b/c v1.0.0\0\n");
        assert!(!file.content().contains('\0'));
        assert!(file.parse().is_valid());
    }

    #[test]
    fn test_validate_lib_name_types() {
        assert_eq!(
            validate_lib(RawLib::new(RawValue::Int(5), "1.0")),
            Err(ParseError::UnexpectedDependencyNameType { found: "Integer" })
        );
        assert_eq!(
            validate_lib(RawLib::new(RawValue::Absent, "1.0")),
            Err(ParseError::UnexpectedDependencyNameType { found: "nil" })
        );
        assert_eq!(
            validate_lib(RawLib::new("   ", "1.0")),
            Err(ParseError::BlankDependencyName)
        );
    }

    #[test]
    fn test_validate_lib_version_types() {
        assert_eq!(
            validate_lib(RawLib::new("a", RawValue::Int(2))),
            Ok(Lib::new("a", Some("2".to_string())))
        );
        assert_eq!(
            validate_lib(RawLib::new("a", RawValue::Float(1.0))),
            Ok(Lib::new("a", Some("1.0".to_string())))
        );
        assert_eq!(
            validate_lib(RawLib::new("a", RawValue::Other("Array"))),
            Err(ParseError::UnexpectedDependencyVersionType { found: "Array" })
        );
        assert_eq!(
            validate_lib(RawLib::new("a", "  ")),
            Ok(Lib::new("a", None))
        );
    }

    #[test]
    fn test_validate_lib_trims_and_sanitizes() {
        assert_eq!(
            validate_lib(RawLib::new("  golang.org/x/mod ", "v0.15.0")),
            Ok(Lib::new("golang.org/x/mod", Some("0.15.0".to_string())))
        );
    }

    #[test]
    fn test_version_validation_failure() {
        let err = validate_lib(RawLib::new("pkg", "latest")).unwrap_err();
        assert!(matches!(
            err,
            ParseError::StringValidation {
                field: LibField::Version,
                ..
            }
        ));
    }
}
