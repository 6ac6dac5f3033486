//! Parser for Maven project files (pom.xml)
//!
//! Only `project/dependencies/dependency` entries are read; managed
//! dependencies and plugin dependencies are not libraries of the project.
//! `${...}` versions are resolved from `project/properties` and the project's
//! own version. Anything that does not resolve leaves the version absent.

use std::collections::HashMap;

use super::xml::{Element, parse_document};
use super::{Parser, RawLib};
use crate::error::Result;

/// Parser for Maven pom.xml files
#[derive(Debug, Default)]
pub struct MavenParser;

impl MavenParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for MavenParser {
    fn parse(&self, content: &str) -> Result<Vec<RawLib>> {
        let project = parse_document(content)?;
        if project.name != "project" {
            return Ok(Vec::new());
        }

        let properties = collect_properties(&project);
        let Some(dependencies) = project.child("dependencies") else {
            return Ok(Vec::new());
        };

        let libs = dependencies
            .children_named("dependency")
            .map(|dependency| {
                let version = dependency
                    .child_text("version")
                    .and_then(|v| resolve_property(v, &properties));
                RawLib::new(dependency.child_text("artifactId"), version)
            })
            .collect();

        Ok(libs)
    }
}

fn collect_properties(project: &Element) -> HashMap<String, String> {
    let mut properties: HashMap<String, String> = project
        .child("properties")
        .map(|props| {
            props
                .children
                .iter()
                .map(|p| (p.name.clone(), p.text.trim().to_string()))
                .collect()
        })
        .unwrap_or_default();

    if let Some(version) = project.child_text("version") {
        properties.insert("project.version".to_string(), version.to_string());
        properties.insert("version".to_string(), version.to_string());
    }

    properties
}

/// Substitute a whole-value `${name}` reference. Partial or chained references
/// are not resolved.
fn resolve_property(version: &str, properties: &HashMap<String, String>) -> Option<String> {
    if !version.contains("${") {
        return Some(version.to_string());
    }

    let key = version.strip_prefix("${")?.strip_suffix('}')?;
    properties
        .get(key)
        .filter(|value| !value.contains("${"))
        .cloned()
}
