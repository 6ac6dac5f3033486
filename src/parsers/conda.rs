//! Parser for Conda environment files (environment.yml)

use serde_yaml::Value;

use super::python::parse_requirement;
use super::{Parser, RawLib, RawValue};
use crate::error::{ParseError, Result};

/// Parser for Conda environment.yml files
#[derive(Debug, Default)]
pub struct CondaParser;

impl CondaParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for CondaParser {
    fn parse(&self, content: &str) -> Result<Vec<RawLib>> {
        let document: Value =
            serde_yaml::from_str(content).map_err(|e| ParseError::Deserialization {
                format: "YAML",
                detail: Some(e.to_string()),
            })?;

        let root = match &document {
            Value::Mapping(root) => root,
            Value::Sequence(_) => return Err(ParseError::UnexpectedNode),
            _ => return Ok(Vec::new()),
        };

        let entries = match root.get("dependencies") {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Sequence(entries)) => entries,
            Some(_) => return Err(ParseError::UnexpectedNode),
        };

        let mut libs = Vec::new();
        for entry in entries {
            match entry {
                Value::String(spec) => libs.extend(parse_match_spec(spec)),
                // `- pip: [requests==2.31.0, ...]`
                Value::Mapping(nested) => {
                    if let Some(pip) = nested.get("pip") {
                        let Value::Sequence(requirements) = pip else {
                            return Err(ParseError::UnexpectedNode);
                        };
                        for requirement in requirements {
                            let Value::String(requirement) = requirement else {
                                return Err(ParseError::UnexpectedNode);
                            };
                            libs.extend(parse_requirement(requirement));
                        }
                    }
                }
                _ => return Err(ParseError::UnexpectedNode),
            }
        }

        Ok(libs)
    }
}

/// Parse a conda match spec: `numpy=1.21.0=py39h`, `conda-forge::scipy`,
/// `python>=3.8`, `pandas 2.0.*`.
fn parse_match_spec(spec: &str) -> Option<RawLib> {
    let spec = spec.trim();
    let spec = spec.rsplit_once("::").map_or(spec, |(_, rest)| rest);

    let split_at = spec
        .find(['=', '<', '>', '!', '~', ' '])
        .unwrap_or(spec.len());
    let name = spec[..split_at].trim();
    let rest = spec[split_at..].trim();

    if name.is_empty() {
        return None;
    }

    // `=1.0=build` and `==1.0` pin an exact version; the build string is dropped
    let version = if let Some(exact) = rest.strip_prefix("==").or_else(|| rest.strip_prefix('=')) {
        exact.split('=').next().unwrap_or_default().trim()
    } else {
        rest
    };

    let version = if version.is_empty() {
        RawValue::Absent
    } else {
        RawValue::from(version)
    };
    Some(RawLib::new(name, version))
}
