// CLI command definitions

use super::webserver::{CleanupCommand, RenderCommand, RunCommand};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "webserver-harness")]
#[command(about = "Provision a webserver behind a namespace, pod, service and route, then verify it", long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Create the chain, run the checks and tear everything down
    Run(RunCommand),

    /// Print a rendered Pod or Service manifest without touching the cluster
    Render(RenderCommand),

    /// Delete a leftover webserver namespace for the current operator
    Cleanup(CleanupCommand),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_overrides() {
        let args = CliArgs::parse_from([
            "webserver-harness",
            "run",
            "--service-type",
            "ClusterIP",
            "-D",
            "timeouts.pod=30",
            "-Droute.port=8080",
        ]);
        match args.command {
            Commands::Run(cmd) => {
                assert_eq!(cmd.service_type.as_deref(), Some("ClusterIP"));
                assert_eq!(cmd.properties, vec!["timeouts.pod=30", "route.port=8080"]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_render() {
        let args = CliArgs::parse_from([
            "webserver-harness",
            "render",
            "--kind",
            "Service",
            "--namespace",
            "webserver-bob",
            "--set",
            "port=8080",
        ]);
        match args.command {
            Commands::Render(cmd) => {
                assert_eq!(cmd.kind, "Service");
                assert_eq!(cmd.namespace.as_deref(), Some("webserver-bob"));
                assert_eq!(cmd.set, vec!["port=8080"]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
