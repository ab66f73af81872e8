//! `spielplan abbreviate`: competition names to identifiers.

use spielplan_core::identifier::abbreviate;

use crate::error::CliResult;

/// Returns one `<identifier>\t<name>` line per name.
pub fn render(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("{}\t{}\n", abbreviate(name), name))
        .collect()
}

/// Runs the abbreviate command.
pub fn run(names: &[String]) -> CliResult<()> {
    print!("{}", render(names));
    Ok(())
}
