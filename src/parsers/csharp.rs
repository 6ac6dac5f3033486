//! Parser for C# .csproj files (NuGet PackageReference format)

use super::xml::{Element, parse_document};
use super::{Parser, RawLib};
use crate::error::Result;

/// Parser for C# .csproj files
#[derive(Debug, Default)]
pub struct CsharpParser;

impl CsharpParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for CsharpParser {
    fn parse(&self, content: &str) -> Result<Vec<RawLib>> {
        let project = parse_document(content)?;
        let mut libs = Vec::new();

        // Format 1: <PackageReference Include="Package" Version="1.0.0" />
        // Format 2: <PackageReference Include="Package"><Version>1.0.0</Version></PackageReference>
        for item_group in project.children_named("ItemGroup") {
            for reference in item_group.children_named("PackageReference") {
                libs.push(package_reference(reference));
            }
        }

        Ok(libs)
    }
}

fn package_reference(reference: &Element) -> RawLib {
    let version = reference
        .attribute("Version")
        .or_else(|| reference.child_text("Version"));

    // Version may be absent when it is centrally managed (Directory.Packages.props)
    RawLib::new(reference.attribute("Include"), version)
}
