mod config;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use pallet_agent::{
    Agent, AnyAgent, DEFAULT_OLLAMA_HOST, DEFAULT_OLLAMA_MODEL, OllamaAgent, PredictServer,
    RemoteAgent, RunReport, ScriptedAgent, Session, StopSignal,
};
use pallet_game::{
    ActionExecutor, Environment, GridEnvironment, MemoryDecoder, PokemonEnvironment, Ram,
    SnapshotDevice,
};
use tracing_subscriber::EnvFilter;

use crate::config::{EnvSettings, RunConfig, SECRET_ENV};

#[derive(Parser, Debug)]
#[command(
    name = "pallet",
    version,
    about = "Drive game environments with LLM agents"
)]
struct Cli {
    /// Log at debug level
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run an environment loop described by a JSON config
    Run {
        #[arg(long, value_name = "FILE")]
        config: PathBuf,

        /// Stop after this many steps (overrides the config)
        #[arg(long)]
        max_steps: Option<u64>,
    },
    /// Serve an agent over HTTP at POST /predict
    Serve {
        #[arg(long, value_enum, default_value_t = ServeAgent::Ollama)]
        agent: ServeAgent,

        #[arg(long, default_value = DEFAULT_OLLAMA_MODEL)]
        model: String,

        #[arg(long, default_value = DEFAULT_OLLAMA_HOST)]
        ollama_host: String,

        /// Upstream endpoint for the remote agent
        #[arg(long)]
        api_url: Option<String>,

        #[arg(long)]
        api_key: Option<String>,

        /// Canned reply for the scripted agent, repeatable
        #[arg(long = "reply")]
        replies: Vec<String>,

        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        #[arg(long, default_value_t = 5000)]
        port: u16,
    },
    /// Decode a 64 KiB RAM dump and print the game state
    Inspect {
        #[arg(long, value_name = "FILE")]
        memory: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ServeAgent {
    Ollama,
    Remote,
    Scripted,
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run { config, max_steps } => run(&config, max_steps, cli.debug).await,
        Command::Serve {
            agent,
            model,
            ollama_host,
            api_url,
            api_key,
            replies,
            host,
            port,
        } => {
            init_tracing(cli.debug);
            let agent = match agent {
                ServeAgent::Ollama => AnyAgent::Ollama(
                    OllamaAgent::new(model)
                        .with_host(ollama_host)
                        .streaming(cli.debug),
                ),
                ServeAgent::Remote => {
                    let Some(url) = api_url else {
                        bail!("--api-url is required for the remote agent");
                    };
                    let mut remote = RemoteAgent::new(url);
                    if let Some(key) = api_key {
                        remote = remote.with_api_key(key);
                    }
                    AnyAgent::Remote(remote)
                }
                ServeAgent::Scripted => {
                    if replies.is_empty() {
                        bail!("at least one --reply is required for the scripted agent");
                    }
                    AnyAgent::Scripted(ScriptedAgent::from_texts(replies).cycling())
                }
            };
            serve(agent, format!("{host}:{port}")).await
        }
        Command::Inspect { memory } => {
            init_tracing(cli.debug);
            inspect(&memory)
        }
    }
}

async fn run(path: &Path, max_steps: Option<u64>, debug: bool) -> Result<()> {
    let config = RunConfig::load(path)?;
    let env = config.environment()?;
    let agent = config.agent()?;
    init_tracing(debug || env.debug() || agent.debug());

    let agent = agent.build();
    let executor =
        ActionExecutor::from_config(&config.executor).context("invalid executor timing")?;
    let max_steps = max_steps.or(config.max_steps);

    let stop = StopSignal::new();
    stop.raise_on_ctrl_c();

    tracing::info!(
        env = ?config.env_type,
        agent = agent.kind(),
        max_steps = ?max_steps,
        "Starting session"
    );

    let report = match env {
        EnvSettings::Pokemon(args) => {
            let device = SnapshotDevice::from_dump(&args.memory_dump).with_context(|| {
                format!("failed to load memory dump {}", args.memory_dump.display())
            })?;
            let env = PokemonEnvironment::new(device, executor, args.headless);
            drive(env, agent, stop, max_steps).await?
        }
        EnvSettings::Grid(args) => {
            let env = GridEnvironment::new(args.width, args.height)?;
            drive(env, agent, stop, max_steps).await?
        }
    };

    let diagnostics = &report.diagnostics;
    println!("Steps: {} ({:?})", report.steps, report.reason);
    println!(
        "Fallbacks: {} (invalid {}, unrecognized {}, no answer {}, agent failures {})",
        diagnostics.fallbacks(),
        diagnostics.invalid_actions,
        diagnostics.unrecognized_responses,
        diagnostics.no_answers,
        diagnostics.agent_failures
    );
    let actions: Vec<&str> = diagnostics.action_history.iter().copied().collect();
    println!("Actions: {}", actions.join(" "));
    Ok(())
}

async fn drive<E, G>(
    env: E,
    agent: G,
    stop: StopSignal,
    max_steps: Option<u64>,
) -> Result<RunReport>
where
    E: Environment,
    G: Agent,
{
    let mut session = Session::new(env, agent)
        .with_stop_signal(stop)
        .with_max_steps(max_steps);
    Ok(session.run().await?)
}

async fn serve(agent: AnyAgent, addr: String) -> Result<()> {
    let secret = std::env::var(SECRET_ENV)
        .with_context(|| format!("{SECRET_ENV} must be set to start the server"))?;
    tracing::info!(agent = agent.kind(), addr = %addr, "Starting prediction server");

    let server = Arc::new(PredictServer::new(agent, secret)?);
    let stop = StopSignal::new();
    stop.raise_on_ctrl_c();

    let runtime = tokio::runtime::Handle::current();
    tokio::task::spawn_blocking(move || server.serve(&addr, &runtime, &stop))
        .await
        .context("prediction server thread panicked")??;
    Ok(())
}

fn inspect(path: &Path) -> Result<()> {
    let ram = Ram::load(path).with_context(|| format!("failed to load {}", path.display()))?;
    let summary = MemoryDecoder::new(&ram)
        .summary()
        .context("failed to decode game state")?;
    println!("{summary}");
    Ok(())
}
