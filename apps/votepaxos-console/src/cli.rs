use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use votepaxos_client::config::{ClientConfig, ConfigError, IdentitySource, DEFAULT_SERVER};

use crate::telemetry::{LogConfig, LogLevel};

#[derive(Parser, Debug)]
#[command(
    name = "votepaxos",
    about = "Operate a VotePaxos voting network from the terminal",
    author,
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub logging: LoggingArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    #[arg(
        long,
        global = true,
        env = "VOTEPAXOS_SERVER",
        default_value = DEFAULT_SERVER,
        help = "Base URL of the VotePaxos backend"
    )]
    pub server: String,

    #[arg(
        long = "rpc-timeout-ms",
        global = true,
        env = "VOTEPAXOS_RPC_TIMEOUT_MS",
        value_name = "MS",
        help = "Timeout for realtime channel commands"
    )]
    pub rpc_timeout_ms: Option<u64>,

    #[arg(
        long,
        global = true,
        env = "VOTEPAXOS_IDENTITY",
        value_name = "ID",
        help = "Use this voter identity instead of asking the backend"
    )]
    pub identity: Option<String>,

    #[arg(
        long = "skip-preflight",
        global = true,
        env = "VOTEPAXOS_SKIP_PREFLIGHT",
        help = "Generate a random identity locally instead of calling preflight"
    )]
    pub skip_preflight: bool,
}

impl ConnectionArgs {
    pub fn to_config(&self) -> Result<ClientConfig, ConfigError> {
        let mut config = ClientConfig::from_env()?;
        let server = ClientConfig::new(&self.server)?;
        config.server = server.server;
        if let Some(ms) = self.rpc_timeout_ms {
            config.rpc_timeout = std::time::Duration::from_millis(ms);
        }
        config.identity = match &self.identity {
            Some(id) if !id.trim().is_empty() => IdentitySource::Fixed(id.trim().to_string()),
            _ if self.skip_preflight => IdentitySource::Generated,
            _ => IdentitySource::Preflight,
        };
        Ok(config)
    }
}

#[derive(Args, Debug, Clone)]
pub struct LoggingArgs {
    #[arg(
        long = "log-level",
        global = true,
        value_enum,
        env = "VOTEPAXOS_LOG_LEVEL",
        default_value_t = LogLevel::Warn,
        help = "Minimum log level (error, warn, info, debug, trace)"
    )]
    pub level: LogLevel,

    #[arg(
        long = "log-file",
        global = true,
        value_name = "PATH",
        env = "VOTEPAXOS_LOG_FILE",
        help = "Write logs to the specified file instead of stderr"
    )]
    pub file: Option<PathBuf>,
}

impl LoggingArgs {
    pub fn to_config(&self) -> LogConfig {
        LogConfig {
            level: self.level,
            file: self.file.clone(),
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Interactive console (default when no subcommand is given)
    Console,
    /// Show the roster, membership health and connection state
    Status,
    /// Spawn simulated voters
    Spawn {
        #[arg(default_value_t = 1)]
        count: u32,
    },
    /// Terminate one voter by id
    Kill { id: String },
    /// Leave the network and terminate every process
    Destroy,
    /// Run the network setup wizard
    Setup(SetupArgs),
    /// List the policy catalog
    Policies {
        #[arg(long, short)]
        filter: Option<String>,
    },
    /// Propose a policy by catalog number or description
    Propose {
        #[arg(required = true, num_args = 1..)]
        selector: Vec<String>,
    },
    /// Show concluded proposals
    History,
    /// Describe an ideology coordinate pair
    Describe {
        #[arg(allow_negative_numbers = true)]
        economic: f64,
        #[arg(allow_negative_numbers = true)]
        social: f64,
    },
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupArgs {
    /// Simulated voters to spawn; prompted for when omitted
    #[arg(long)]
    pub voters: Option<u32>,

    /// Apply without asking for confirmation
    #[arg(long, short)]
    pub yes: bool,
}

impl Command {
    /// Whether the command needs a live backend session.
    pub fn needs_session(&self) -> bool {
        !matches!(self, Command::Policies { .. } | Command::Describe { .. })
    }

    /// Whether the command ends with a roster re-fetch, after which the
    /// session may need to join the network.
    pub fn refreshes_roster(&self) -> bool {
        matches!(
            self,
            Command::Spawn { .. } | Command::Kill { .. } | Command::Propose { .. } | Command::Setup(_)
        )
    }
}

/// A line typed into the interactive console.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
pub struct ConsoleLine {
    #[command(subcommand)]
    pub command: Command,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_timeout::timeout]
    fn defaults_to_no_subcommand() {
        let cli = Cli::try_parse_from(["votepaxos"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.logging.level, LogLevel::Warn);
    }

    #[test_timeout::timeout]
    fn propose_joins_words() {
        let cli = Cli::try_parse_from(["votepaxos", "propose", "carbon", "tax"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Propose {
                selector: vec!["carbon".into(), "tax".into()]
            })
        );
    }

    #[test_timeout::timeout]
    fn describe_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from(["votepaxos", "describe", "-8", "9.5"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Describe {
                economic: -8.0,
                social: 9.5
            })
        );
    }

    #[test_timeout::timeout]
    fn console_lines_parse_without_binary_name() {
        let line = ConsoleLine::try_parse_from(["setup", "--voters", "3", "--yes"]).unwrap();
        assert_eq!(
            line.command,
            Command::Setup(SetupArgs {
                voters: Some(3),
                yes: true
            })
        );
        let line = ConsoleLine::try_parse_from(["spawn"]).unwrap();
        assert_eq!(line.command, Command::Spawn { count: 1 });
        assert!(!Command::Describe { economic: 0.0, social: 0.0 }.needs_session());
    }

    #[test_timeout::timeout]
    fn roster_changing_commands_trigger_a_join_check() {
        for line in ["kill sim-1", "spawn 2", "propose 3", "setup"] {
            let command = ConsoleLine::try_parse_from(line.split(' ')).unwrap().command;
            assert!(command.refreshes_roster(), "{command:?}");
        }
        assert!(!Command::Destroy.refreshes_roster());
        assert!(!Command::History.refreshes_roster());
        // status joins before printing, inside its own handler
        assert!(!Command::Status.refreshes_roster());
    }
}
