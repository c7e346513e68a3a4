use crate::demo::{run_check, run_demo, run_report, CheckArgs, DemoArgs, ReportArgs};
use crate::server;
use ccb_reforcos::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "CCB Reforços",
    about = "Schedule and audit reinforcement services (cultos, RJM, coletas) across congregations",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Validate a single booking against the seeded schedule without saving it
    Check(CheckArgs),
    /// Print or export the reinforcement schedule
    Report(ReportArgs),
    /// Walk through a month of bookings, including the ones the rules refuse
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Check(args) => run_check(args),
        Command::Report(args) => run_report(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["ccb-reforcos-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn check_accepts_brazilian_dates() {
        let cli = Cli::try_parse_from([
            "ccb-reforcos-api",
            "check",
            "--congregation",
            "3",
            "--date",
            "01/02/2024",
            "--meeting-type",
            "rjm",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Check(args)) => {
                assert_eq!(args.congregation, "3");
                assert_eq!(args.meeting_type, "rjm");
                assert_eq!(args.date.to_string(), "2024-02-01");
            }
            other => panic!("expected check command, got {other:?}"),
        }
    }
}
