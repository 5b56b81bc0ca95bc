mod build;

use crate::Cli;
use crate::CommandResult;
use build::BuildCmd;

#[derive(Debug, clap::Parser)]
#[command(name = "graphql-builder")]
pub(crate) enum CommandEnum {
    /// Assemble an operation and the fragments it uses into one document.
    Build(Box<BuildCmd>),
}
impl CommandEnum {
    pub(crate) async fn run(self, cli: Cli) -> CommandResult {
        match self {
            Self::Build(cmd) => cmd.run(cli).await
        }
    }
}
