use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{info, warn};
use votepaxos_client::realtime::resolve_identity;
use votepaxos_client::{
    ClientConfig, Dashboard, Intent, NetworkClient, RosterStore, Toast, VoterSession,
};
use votepaxos_core::{default_policies, describe_coordinates, find_policy, Coordinates};

use crate::cli::{Cli, Command, SetupArgs};
use crate::console;
use crate::error::CliError;
use crate::toaster::TerminalToaster;
use crate::views::{self, VotersStep};

/// Everything a connected command needs.
pub struct Context {
    pub session: Arc<VoterSession>,
    pub dashboard: Dashboard,
}

/// Line-oriented stdin shared by prompts and the console loop.
pub struct Input {
    lines: Lines<BufReader<Stdin>>,
}

impl Input {
    pub fn stdin() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Prints `prompt` and reads one line; `None` on end of input.
    pub async fn read_line(&mut self, prompt: &str) -> Result<Option<String>, CliError> {
        print!("{prompt}");
        std::io::stdout().flush()?;
        Ok(self.lines.next_line().await?)
    }
}

pub async fn run(cli: Cli) -> Result<(), CliError> {
    let command = cli.command.unwrap_or(Command::Console);
    if !command.needs_session() {
        return run_offline(&command);
    }

    let config = cli.connection.to_config()?;
    let context = connect(&config).await?;
    let mut input = Input::stdin();
    let result = match command {
        Command::Console => console::run(&context, &mut input).await,
        other => execute(&context, &mut input, other).await,
    };
    context.session.close().await;
    result
}

fn run_offline(command: &Command) -> Result<(), CliError> {
    match command {
        Command::Policies { filter } => {
            println!("{}", views::render_policies(&default_policies(), filter.as_deref()));
        }
        Command::Describe { economic, social } => {
            println!("{}", describe_coordinates(Coordinates::new(*economic, *social)));
        }
        other => {
            return Err(CliError::InvalidArgument(format!(
                "{other:?} requires a backend session"
            )))
        }
    }
    Ok(())
}

/// Preflight, first roster fetch, then the realtime session. Mirrors the
/// two loading states an operator sees before anything else is usable.
pub async fn connect(config: &ClientConfig) -> Result<Context, CliError> {
    println!("{}", views::INITIALIZING);
    let api = Arc::new(NetworkClient::from_config(config));
    let identity = resolve_identity(config, api.as_ref()).await?;
    info!(target: "votepaxos::console", identity = %identity, server = %config.server, "identity resolved");

    let roster = RosterStore::new();
    if let Err(err) = roster.fetch(api.as_ref()).await {
        warn!(target: "votepaxos::console", error = %err, "initial roster fetch failed");
    }

    println!("{}", views::CONNECTING);
    let session = Arc::new(VoterSession::establish(config, identity).await?);
    let dashboard = Dashboard::new(
        api,
        session.clone(),
        roster,
        Arc::new(TerminalToaster::new()),
    );
    let context = Context { session, dashboard };
    auto_join(&context).await;
    Ok(context)
}

/// Joins the network as soon as simulated voters exist. Runs again after
/// every roster refresh, since voters may have been spawned elsewhere.
pub async fn auto_join(context: &Context) {
    match context.dashboard.ensure_joined().await {
        Ok(true) => println!(
            "Joined the network as {}.",
            context.dashboard.identity()
        ),
        Ok(false) => {}
        Err(err) => warn!(target: "votepaxos::console", error = %err, "automatic join failed"),
    }
}

fn outcome(toast: Toast) -> Result<(), CliError> {
    match toast.intent {
        Intent::Success => Ok(()),
        Intent::Danger => Err(CliError::ActionFailed),
    }
}

pub async fn execute(context: &Context, input: &mut Input, command: Command) -> Result<(), CliError> {
    let rejoin = command.refreshes_roster();
    let result = dispatch(context, input, command).await;
    if rejoin {
        auto_join(context).await;
    }
    result
}

async fn dispatch(context: &Context, input: &mut Input, command: Command) -> Result<(), CliError> {
    let dashboard = &context.dashboard;
    match command {
        Command::Console => Err(CliError::InvalidArgument("already in the console".into())),
        Command::Status => {
            dashboard
                .refresh()
                .await
                .map_err(|err| CliError::Action(err.user_message("Could not refresh the voter list.")))?;
            auto_join(context).await;
            print_status(context);
            Ok(())
        }
        Command::Spawn { count } => {
            if count == 0 {
                return Err(CliError::InvalidArgument("spawn at least one voter".into()));
            }
            outcome(dashboard.spawn(count).await)
        }
        Command::Kill { id } => outcome(dashboard.kill(&id).await),
        Command::Destroy => outcome(dashboard.destroy_network().await),
        Command::Setup(args) => run_setup(context, input, args).await,
        Command::Propose { selector } => {
            let policy = find_policy(&default_policies(), &selector.join(" "))?;
            outcome(dashboard.propose(&policy).await)
        }
        Command::History => {
            let entries = dashboard
                .history()
                .await
                .map_err(|err| CliError::Action(err.user_message("Could not load the proposal history.")))?;
            println!("{}", views::render_history(entries.as_deref()));
            Ok(())
        }
        offline @ (Command::Policies { .. } | Command::Describe { .. }) => run_offline(&offline),
    }
}

pub fn print_status(context: &Context) {
    let dashboard = &context.dashboard;
    let roster = dashboard.roster();
    let simulated = roster.simulated_voter_count();
    if let Some(banner) = views::render_health(simulated) {
        println!("{banner}\n");
    }
    println!(
        "{}\n",
        views::render_status(
            dashboard.identity().as_str(),
            dashboard.connection_state(),
            dashboard.is_connected_to_network(),
            simulated,
        )
    );
    println!("{}", views::render_roster(&roster.voters(), dashboard.identity()));
}

async fn run_setup(context: &Context, input: &mut Input, args: SetupArgs) -> Result<(), CliError> {
    let dashboard = &context.dashboard;
    let mut step = VotersStep::new(
        dashboard.identity().clone(),
        !dashboard.is_connected_to_network(),
    );
    println!("== {} ==", views::wizard::TITLE);
    for line in step.intro() {
        println!("{line}");
    }

    match args.voters {
        Some(voters) => step.voters = voters,
        None => loop {
            let Some(line) = input.read_line(&step.prompt()).await? else {
                return Err(CliError::InvalidArgument("setup cancelled".into()));
            };
            match step.set_voters(&line) {
                Ok(()) => break,
                Err(err) => println!("{err}"),
            }
        },
    }

    let review = step.review();
    println!("\n{}", review.render());
    if !args.yes {
        let answer = input.read_line("Finish Setup? [y/N] ").await?.unwrap_or_default();
        if !matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
            println!("Setup cancelled.");
            return Ok(());
        }
    }
    outcome(dashboard.finish_setup(review.plan()).await)
}
