use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

use filmstrip_core::config::{ConfigError, FilmstripConfig};
use filmstrip_core::layout::tiles::TextRenderer;
use filmstrip_core::room::room_control::{RoomControlCommand, RoomControlSender};
use filmstrip_core::scenario::{Scenario, ScenarioError, ScenarioRunner, StepReport};

#[derive(Parser, Debug)]
#[command(author, version, about = "Replay a filmstrip scenario", long_about = None)]
struct Args {
    /// Scenario file (JSON)
    scenario: PathBuf,

    /// Filmstrip config file (JSON), defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print each step's view as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
    #[error("Failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

fn print_report(report: &StepReport, json: bool) -> Result<(), CliError> {
    if json {
        println!("{}", serde_json::to_string(report)?);
        return Ok(());
    }

    let marker = if report.reacted { "*" } else { " " };
    println!(
        "#{} {} {} (t={}ms)",
        report.index, marker, report.step, report.elapsed_ms
    );
    let mut renderer = TextRenderer::new();
    report.view.render(&mut renderer);
    for line in renderer.finish().lines() {
        println!("    {line}");
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        log::error!("filmstrip: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), CliError> {
    let config = match &args.config {
        Some(path) => FilmstripConfig::load(path)?,
        None => FilmstripConfig::default(),
    };
    let scenario = Scenario::load(&args.scenario)?;

    let (room_control, mut command_rx) = RoomControlSender::channel();
    let room_task = tokio::spawn(async move {
        let mut handled = 0usize;
        while let Some(command) = command_rx.recv().await {
            match command {
                RoomControlCommand::SetSelectedPeer(peer_id) => {
                    log::info!("room: selected peer requested: {peer_id}");
                }
            }
            handled += 1;
        }
        handled
    });

    let mut runner = ScenarioRunner::new(config, &scenario.my_id, room_control)?;
    for report in runner.run(&scenario) {
        print_report(&report, args.json)?;
    }

    // Dropping the runner closes the command channel and ends the room task.
    drop(runner);
    match room_task.await {
        Ok(handled) => log::info!("filmstrip: {handled} room command(s) sent"),
        Err(e) => log::error!("filmstrip: room task failed: {e:?}"),
    }
    Ok(())
}
