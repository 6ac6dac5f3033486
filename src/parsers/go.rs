//! Parser for Go module files (go.mod)

use super::{Parser, RawLib};
use crate::error::Result;

const INDIRECT_MARKER: &str = "// indirect";

/// The go.mod directive a parenthesized block belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Require,
    /// `replace`, `exclude`, `retract`, `tool`, ...
    Other,
}

/// Parser for Go go.mod dependency files
#[derive(Debug, Default)]
pub struct GoParser;

impl GoParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for GoParser {
    fn parse(&self, content: &str) -> Result<Vec<RawLib>> {
        let mut libs = Vec::new();
        let mut block = None;

        for line in content.lines().map(str::trim) {
            if line.is_empty() || line.starts_with("//") {
                continue;
            }

            if let Some(directive) = line.strip_suffix('(') {
                block = Some(match directive.trim_end() {
                    "require" => Block::Require,
                    _ => Block::Other,
                });
                continue;
            }

            if line == ")" {
                block = None;
                continue;
            }

            let requirement = match block {
                Some(Block::Require) => Some(line),
                Some(Block::Other) => None,
                None => line.strip_prefix("require "),
            };
            libs.extend(requirement.and_then(parse_requirement));
        }

        Ok(libs)
    }
}

/// `module/path v1.2.3 [// comment]`; indirect requirements yield nothing.
fn parse_requirement(requirement: &str) -> Option<RawLib> {
    if requirement.contains(INDIRECT_MARKER) {
        return None;
    }

    let requirement = requirement
        .split_once("//")
        .map_or(requirement, |(before, _)| before);
    let mut fields = requirement.split_whitespace();
    let module = fields.next()?;
    let version = fields.next().filter(|v| v.starts_with('v'))?;

    Some(RawLib::new(module, version))
}
