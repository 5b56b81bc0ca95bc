use crate::Cli;
use crate::CommandResult;

/// A subcommand that can be run once its arguments have been parsed.
pub(crate) trait RunnableCommand: std::fmt::Debug {
    async fn run(self, cli: Cli) -> CommandResult;
}
