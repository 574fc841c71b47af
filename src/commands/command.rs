//! Command trait definition for CLI commands.

use anyhow::Result;

/// Trait implemented by vcfsplit CLI commands.
///
/// The `command_line` parameter contains the full invocation, for logging.
pub trait Command {
    #[allow(clippy::missing_errors_doc)]
    fn execute(&self, command_line: &str) -> Result<()>;
}
