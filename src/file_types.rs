//! Manifest format detection and per-format metadata
//!
//! Each [`ConfigFormat`] variant is one supported manifest grammar. It carries
//! a file-name glob, the language it belongs to, its package-URL type and
//! whether several files of the format may coexist in one repository.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use glob::{MatchOptions, Pattern};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::parsers::conan::{ConanPyParser, ConanTxtParser};
use crate::parsers::conda::CondaParser;
use crate::parsers::csharp::CsharpParser;
use crate::parsers::go::GoParser;
use crate::parsers::gradle::{GradleDialect, GradleParser};
use crate::parsers::maven::MavenParser;
use crate::parsers::npm::{NpmLockParser, NpmParser};
use crate::parsers::php::{ComposerLockParser, ComposerParser};
use crate::parsers::python::{PipParser, PoetryLockParser, PoetryParser};
use crate::parsers::ruby::GemfileLockParser;
use crate::parsers::vcpkg::VcpkgParser;
use crate::parsers::{Parser, RawLib};

/// Supported manifest formats, in dispatch priority order.
///
/// Lock files come before the manifest of the same ecosystem so that the
/// first match for a path is always the most precise one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigFormat {
    CConanPy,
    CConanTxt,
    CppConanPy,
    CppConanTxt,
    CppVcpkg,
    CsharpNuget,
    GoModules,
    JavaGradle,
    JavaMaven,
    JavascriptNpmLock,
    JavascriptNpm,
    KotlinGradle,
    PhpComposerLock,
    PhpComposer,
    PythonConda,
    PythonPip,
    PythonPoetryLock,
    PythonPoetry,
    RubyGemsLock,
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Compiled globs, indexed like [`ConfigFormat::ALL`]
static PATTERNS: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    ConfigFormat::ALL
        .iter()
        .map(|format| Pattern::new(format.file_name_glob()).expect("valid file name glob"))
        .collect()
});

impl ConfigFormat {
    /// Every format, in dispatch priority order.
    pub const ALL: [ConfigFormat; 19] = [
        ConfigFormat::CConanPy,
        ConfigFormat::CConanTxt,
        ConfigFormat::CppConanPy,
        ConfigFormat::CppConanTxt,
        ConfigFormat::CppVcpkg,
        ConfigFormat::CsharpNuget,
        ConfigFormat::GoModules,
        ConfigFormat::JavaGradle,
        ConfigFormat::JavaMaven,
        ConfigFormat::JavascriptNpmLock,
        ConfigFormat::JavascriptNpm,
        ConfigFormat::KotlinGradle,
        ConfigFormat::PhpComposerLock,
        ConfigFormat::PhpComposer,
        ConfigFormat::PythonConda,
        ConfigFormat::PythonPip,
        ConfigFormat::PythonPoetryLock,
        ConfigFormat::PythonPoetry,
        ConfigFormat::RubyGemsLock,
    ];

    /// Stable identifier used in config files, reports and on the command line.
    pub fn id(self) -> &'static str {
        match self {
            ConfigFormat::CConanPy => "c_conan_py",
            ConfigFormat::CConanTxt => "c_conan_txt",
            ConfigFormat::CppConanPy => "cpp_conan_py",
            ConfigFormat::CppConanTxt => "cpp_conan_txt",
            ConfigFormat::CppVcpkg => "cpp_vcpkg",
            ConfigFormat::CsharpNuget => "csharp_nuget",
            ConfigFormat::GoModules => "go_modules",
            ConfigFormat::JavaGradle => "java_gradle",
            ConfigFormat::JavaMaven => "java_maven",
            ConfigFormat::JavascriptNpmLock => "javascript_npm_lock",
            ConfigFormat::JavascriptNpm => "javascript_npm",
            ConfigFormat::KotlinGradle => "kotlin_gradle",
            ConfigFormat::PhpComposerLock => "php_composer_lock",
            ConfigFormat::PhpComposer => "php_composer",
            ConfigFormat::PythonConda => "python_conda",
            ConfigFormat::PythonPip => "python_pip",
            ConfigFormat::PythonPoetryLock => "python_poetry_lock",
            ConfigFormat::PythonPoetry => "python_poetry",
            ConfigFormat::RubyGemsLock => "ruby_gems_lock",
        }
    }

    pub fn file_name_glob(self) -> &'static str {
        match self {
            ConfigFormat::CConanPy | ConfigFormat::CppConanPy => "conanfile.py",
            ConfigFormat::CConanTxt | ConfigFormat::CppConanTxt => "conanfile.txt",
            ConfigFormat::CppVcpkg => "vcpkg.json",
            ConfigFormat::CsharpNuget => "*.csproj",
            ConfigFormat::GoModules => "go.mod",
            ConfigFormat::JavaGradle => "build.gradle",
            ConfigFormat::JavaMaven => "pom.xml",
            ConfigFormat::JavascriptNpmLock => "package-lock.json",
            ConfigFormat::JavascriptNpm => "package.json",
            ConfigFormat::KotlinGradle => "build.gradle.kts",
            ConfigFormat::PhpComposerLock => "composer.lock",
            ConfigFormat::PhpComposer => "composer.json",
            ConfigFormat::PythonConda => "environment.yml",
            ConfigFormat::PythonPip => "*requirements*.txt",
            ConfigFormat::PythonPoetryLock => "poetry.lock",
            ConfigFormat::PythonPoetry => "pyproject.toml",
            ConfigFormat::RubyGemsLock => "Gemfile.lock",
        }
    }

    pub fn lang_name(self) -> &'static str {
        match self {
            ConfigFormat::CConanPy | ConfigFormat::CConanTxt => "C",
            ConfigFormat::CppConanPy | ConfigFormat::CppConanTxt | ConfigFormat::CppVcpkg => "C++",
            ConfigFormat::CsharpNuget => "C#",
            ConfigFormat::GoModules => "Go",
            ConfigFormat::JavaGradle | ConfigFormat::JavaMaven => "Java",
            ConfigFormat::JavascriptNpmLock | ConfigFormat::JavascriptNpm => "JavaScript",
            ConfigFormat::KotlinGradle => "Kotlin",
            ConfigFormat::PhpComposerLock | ConfigFormat::PhpComposer => "PHP",
            ConfigFormat::PythonConda
            | ConfigFormat::PythonPip
            | ConfigFormat::PythonPoetryLock
            | ConfigFormat::PythonPoetry => "Python",
            ConfigFormat::RubyGemsLock => "Ruby",
        }
    }

    /// Package-URL type of the ecosystem the format's libraries come from.
    pub fn purl_type(self) -> &'static str {
        match self {
            ConfigFormat::CConanPy
            | ConfigFormat::CConanTxt
            | ConfigFormat::CppConanPy
            | ConfigFormat::CppConanTxt => "conan",
            ConfigFormat::CppVcpkg => "generic",
            ConfigFormat::CsharpNuget => "nuget",
            ConfigFormat::GoModules => "golang",
            ConfigFormat::JavaGradle | ConfigFormat::JavaMaven | ConfigFormat::KotlinGradle => {
                "maven"
            }
            ConfigFormat::JavascriptNpmLock | ConfigFormat::JavascriptNpm => "npm",
            ConfigFormat::PhpComposerLock | ConfigFormat::PhpComposer => "composer",
            ConfigFormat::PythonConda => "conda",
            ConfigFormat::PythonPip | ConfigFormat::PythonPoetryLock | ConfigFormat::PythonPoetry => {
                "pypi"
            }
            ConfigFormat::RubyGemsLock => "gem",
        }
    }

    /// Whether every matching file in a repository is parsed, not just one.
    pub fn supports_multiple_files(self) -> bool {
        matches!(self, ConfigFormat::PythonPip)
    }

    /// Match the file name at the end of a repository-relative `path`.
    ///
    /// Case sensitive; file names starting with a dot are matched like any other.
    pub fn matches(self, path: &str) -> bool {
        let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
        PATTERNS[self as usize].matches_with(file_name, MATCH_OPTIONS)
    }

    /// Extract raw library candidates from sanitized file content.
    pub fn extract(self, content: &str) -> Result<Vec<RawLib>> {
        self.parser().parse(content)
    }

    fn parser(self) -> Box<dyn Parser> {
        match self {
            ConfigFormat::CConanPy | ConfigFormat::CppConanPy => Box::new(ConanPyParser::new()),
            ConfigFormat::CConanTxt | ConfigFormat::CppConanTxt => Box::new(ConanTxtParser::new()),
            ConfigFormat::CppVcpkg => Box::new(VcpkgParser::new()),
            ConfigFormat::CsharpNuget => Box::new(CsharpParser::new()),
            ConfigFormat::GoModules => Box::new(GoParser::new()),
            ConfigFormat::JavaGradle => Box::new(GradleParser::new(GradleDialect::Groovy)),
            ConfigFormat::JavaMaven => Box::new(MavenParser::new()),
            ConfigFormat::JavascriptNpmLock => Box::new(NpmLockParser::new()),
            ConfigFormat::JavascriptNpm => Box::new(NpmParser::new()),
            ConfigFormat::KotlinGradle => Box::new(GradleParser::new(GradleDialect::Kotlin)),
            ConfigFormat::PhpComposerLock => Box::new(ComposerLockParser::new()),
            ConfigFormat::PhpComposer => Box::new(ComposerParser::new()),
            ConfigFormat::PythonConda => Box::new(CondaParser::new()),
            ConfigFormat::PythonPip => Box::new(PipParser::new()),
            ConfigFormat::PythonPoetryLock => Box::new(PoetryLockParser::new()),
            ConfigFormat::PythonPoetry => Box::new(PoetryParser::new()),
            ConfigFormat::RubyGemsLock => Box::new(GemfileLockParser::new()),
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error for an unrecognized format identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown manifest format `{0}`")]
pub struct UnknownFormat(pub String);

impl FromStr for ConfigFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ConfigFormat::ALL
            .into_iter()
            .find(|format| format.id() == s)
            .ok_or_else(|| UnknownFormat(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_in_declaration_order() {
        for (idx, format) in ConfigFormat::ALL.iter().enumerate() {
            assert_eq!(*format as usize, idx, "{format} out of order");
        }
    }

    #[test]
    fn test_ids_round_trip_and_match_serde() {
        for format in ConfigFormat::ALL {
            assert_eq!(format.id().parse::<ConfigFormat>(), Ok(format));
            assert_eq!(
                serde_json::to_value(format).unwrap(),
                serde_json::Value::String(format.id().to_string())
            );
        }
        assert!("cargo".parse::<ConfigFormat>().is_err());
    }

    #[test]
    fn test_matches_exact_names() {
        assert!(ConfigFormat::GoModules.matches("go.mod"));
        assert!(ConfigFormat::GoModules.matches("services/api/go.mod"));
        assert!(!ConfigFormat::GoModules.matches("go.sum"));
        assert!(ConfigFormat::RubyGemsLock.matches("Gemfile.lock"));
        assert!(!ConfigFormat::RubyGemsLock.matches("gemfile.lock"));
    }

    #[test]
    fn test_matches_wildcards() {
        assert!(ConfigFormat::CsharpNuget.matches("src/App/App.csproj"));
        assert!(ConfigFormat::PythonPip.matches("requirements.txt"));
        assert!(ConfigFormat::PythonPip.matches("requirements-dev.txt"));
        assert!(ConfigFormat::PythonPip.matches("deploy/dev-requirements.txt"));
        assert!(!ConfigFormat::PythonPip.matches("requirements/base.txt"));
        assert!(!ConfigFormat::PythonPip.matches("requirements.in"));
    }

    #[test]
    fn test_matches_dotfiles() {
        assert!(ConfigFormat::PythonPip.matches(".requirements.txt"));
        assert!(ConfigFormat::CsharpNuget.matches(".hidden.csproj"));
    }

    #[test]
    fn test_lock_file_does_not_match_manifest_glob() {
        assert!(!ConfigFormat::JavascriptNpm.matches("package-lock.json"));
        assert!(!ConfigFormat::JavaGradle.matches("build.gradle.kts"));
        assert!(!ConfigFormat::KotlinGradle.matches("build.gradle"));
    }

    #[test]
    fn test_only_pip_supports_multiple_files() {
        let multi: Vec<_> = ConfigFormat::ALL
            .into_iter()
            .filter(|f| f.supports_multiple_files())
            .collect();
        assert_eq!(multi, vec![ConfigFormat::PythonPip]);
    }

    #[test]
    fn test_metadata() {
        assert_eq!(ConfigFormat::CppVcpkg.lang_name(), "C++");
        assert_eq!(ConfigFormat::CppVcpkg.purl_type(), "generic");
        assert_eq!(ConfigFormat::KotlinGradle.purl_type(), "maven");
        assert_eq!(ConfigFormat::RubyGemsLock.purl_type(), "gem");
        assert_eq!(ConfigFormat::GoModules.purl_type(), "golang");
    }

    #[test]
    fn test_extract_dispatches_to_parser() {
        let libs = ConfigFormat::GoModules
            .extract("require golang.org/x/mod v0.15.0\n")
            .unwrap();
        assert_eq!(libs, vec![RawLib::new("golang.org/x/mod", "v0.15.0")]);
    }
}
