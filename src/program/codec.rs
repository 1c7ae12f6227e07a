use super::instruction::{Instruction, OpClass};
use crate::config::MaintenancePolicy;
use crate::error::ParseWarning;
use crate::tree::{EntityNode, ProgramTree};
use itertools::Itertools;
use tracing::debug;

/// A maintenance entry kept verbatim so it can be re-emitted untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassthroughEntry {
    pub class: OpClass,
    pub raw: String,
}

/// The result of parsing a program string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedProgram {
    /// User-editable instructions, in authored order.
    pub instructions: Vec<Instruction>,
    /// Maintenance entries, in authored order.
    pub passthrough: Vec<PassthroughEntry>,
    /// Entries that were dropped, and why.
    pub warnings: Vec<ParseWarning>,
}

/// Parses a space-separated program string.
///
/// Each entry is `CLASS:FUNCTION:TARGET[:PARAM]*`. An empty target falls back to
/// `fallback_target_id`. Malformed entries are dropped and reported in
/// [`ParsedProgram::warnings`].
pub fn parse(program: &str, fallback_target_id: &str) -> ParsedProgram {
    let mut parsed = ParsedProgram::default();

    for entry in program.split_whitespace() {
        match parse_entry(entry, fallback_target_id) {
            Ok(instruction) => {
                let class = instruction
                    .class
                    .clone()
                    .filter(OpClass::is_maintenance);
                match class {
                    Some(class) => parsed.passthrough.push(PassthroughEntry {
                        class,
                        raw: entry.to_string(),
                    }),
                    None => parsed.instructions.push(instruction),
                }
            }
            Err(warning) => {
                debug!(%warning, "dropping malformed program entry");
                parsed.warnings.push(warning);
            }
        }
    }

    parsed
}

fn parse_entry(entry: &str, fallback_target_id: &str) -> Result<Instruction, ParseWarning> {
    let fields: Vec<&str> = entry.split(':').collect();
    if fields.len() < 3 {
        return Err(ParseWarning::MissingFields {
            entry: entry.to_string(),
            found: fields.len(),
        });
    }

    let empty = |field: &'static str| ParseWarning::EmptyField {
        entry: entry.to_string(),
        field,
    };

    let class: OpClass = fields[0].parse().map_err(|_| empty("class"))?;
    let function = fields[1];
    if function.is_empty() {
        return Err(empty("function"));
    }
    let target_id = match fields[2] {
        "" => fallback_target_id,
        id => id,
    };
    if target_id.is_empty() {
        return Err(empty("target"));
    }

    let params = fields[3..].iter().map(|p| p.to_string()).collect();
    Ok(Instruction::new(class, function, target_id, params))
}

/// Encodes entity nodes back into a program string.
///
/// Entities without a selected id and incomplete drafts are skipped. Entries are
/// emitted in tree order.
pub fn encode(nodes: &[EntityNode]) -> String {
    nodes
        .iter()
        .filter(|node| !node.entity_id.is_empty())
        .flat_map(|node| node.actions.iter())
        .filter_map(|action| action.instruction.to_token())
        .join(" ")
}

/// Encodes a whole tree, re-emitting its maintenance entries according to `policy`.
///
/// Pre-steps are placed before the tree's entries; post-steps and pool syncs after.
/// Maintenance entries keep their text verbatim but not their original position: a
/// post-step that sat between user entries is re-emitted at the end.
pub fn encode_program(tree: &ProgramTree, policy: MaintenancePolicy) -> String {
    let body = encode(tree.nodes());
    if policy == MaintenancePolicy::Drop {
        return body;
    }

    let (pre, post): (Vec<&PassthroughEntry>, Vec<&PassthroughEntry>) = tree
        .passthrough()
        .iter()
        .partition(|entry| entry.class == OpClass::PreStep);

    pre.iter()
        .map(|entry| entry.raw.as_str())
        .chain(Some(body.as_str()).filter(|b| !b.is_empty()))
        .chain(post.iter().map(|entry| entry.raw.as_str()))
        .join(" ")
}
