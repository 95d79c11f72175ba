use anyhow::Context;
use clap::Parser;
use crossterm::style::Stylize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use shinyhunt::config::{ConfigResolver, Roots};
use shinyhunt::constants::DEFAULT_CONFIG_FILE;
use shinyhunt::encounter::{EncounterEvent, HuntState};
use shinyhunt::hunt::{HuntEvent, HuntSetup};
use shinyhunt::utils::{default_data_root, version_line};
use shinyhunt::CatalogStore;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// Idle shiny hunting in the terminal.
#[derive(Debug, Parser)]
#[command(name = "shinyhunt", disable_version_flag = true)]
struct Args {
    /// Writable directory for progress, journal and logs
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory holding the bundled assets
    #[arg(long)]
    assets_dir: Option<PathBuf>,

    /// Config override, relative to the data directory unless absolute
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Seed for reproducible hunts
    #[arg(long)]
    seed: Option<u64>,

    /// Resume automatically after a shiny instead of waiting for Enter
    #[arg(long)]
    auto_continue: bool,

    /// Show version information
    #[arg(short = 'V', long)]
    version: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if args.version {
        println!("shinyhunt {}", version_line());
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("shinyhunt=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let data_root = match args.data_dir.clone() {
        Some(dir) => dir,
        None => default_data_root().context("no data directory; pass --data-dir")?,
    };
    let assets_root = args
        .assets_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")));

    let config = ConfigResolver::new(Roots::new(assets_root, data_root))
        .resolve(Some(&args.config))
        .context("could not prepare the data directory")?;

    let catalogs = CatalogStore::new();
    let setup = match HuntSetup::prepare(&config, &catalogs) {
        Ok(setup) => setup,
        Err(e) => {
            eprintln!("{} {}", "No Pokémon data available.".red(), e);
            eprintln!("Details were written to {}", config.error_log_file.display());
            std::process::exit(1);
        }
    };

    println!("Walking through the Pokémon world...");
    println!(
        "{} creatures in the grass, {} shinies found so far.",
        setup.engine().catalog().len(),
        setup.total_finds()
    );

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut hunt = setup.spawn(rng);
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut elapsed = Duration::ZERO;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            // Read all the time so keys pressed while hunting are consumed
            // here instead of answering the next pause
            line = stdin.next_line(), if stdin_open => {
                match line {
                    Ok(Some(text)) => match line_action(&text, hunt.state()) {
                        LineAction::Quit => break,
                        LineAction::Continue => hunt.continue_hunt().await?,
                        LineAction::Ignore => {}
                    },
                    Ok(None) | Err(_) => {
                        stdin_open = false;
                        // Nobody can press Enter any more
                        if hunt.state() == HuntState::RareFound && !args.auto_continue {
                            break;
                        }
                    }
                }
            }
            event = hunt.next_event() => {
                let Some(event) = event else { break };
                match event {
                    HuntEvent::Started { .. } => {}
                    HuntEvent::Encounter(encounter) => show_encounter(&encounter, elapsed),
                    HuntEvent::RareFound { event, total_finds, entry } => {
                        show_rare(&event, total_finds, entry.count, config.mute_audio);
                        if args.auto_continue {
                            hunt.continue_hunt().await?;
                        } else if !stdin_open {
                            break;
                        } else {
                            println!("Press Enter to continue the hunt, or q then Enter to quit.");
                        }
                    }
                    HuntEvent::Resumed => println!("{}", "Continuing the hunt...".green()),
                    HuntEvent::Elapsed(d) => elapsed = d,
                    HuntEvent::Stopped => break,
                }
            }
        }
    }

    let outcome = hunt.shutdown().await?;
    println!(
        "Stopped. Shiny Pokémon found: {} ({} species in the journal)",
        outcome.progress.count(),
        outcome.journal.len()
    );
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineAction {
    Quit,
    Continue,
    Ignore,
}

/// What a line typed by the operator means in the given hunt state.
fn line_action(text: &str, state: HuntState) -> LineAction {
    if text.trim().eq_ignore_ascii_case("q") {
        LineAction::Quit
    } else if state == HuntState::RareFound {
        LineAction::Continue
    } else {
        LineAction::Ignore
    }
}

fn clock(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn show_encounter(event: &EncounterEvent, elapsed: Duration) {
    println!(
        "[{}] #{:<5} You encountered a wild {} ({})",
        clock(elapsed),
        event.sequence,
        event.name,
        event.rarity
    );
    if event.hinted {
        println!("{}", "You hear a shiny Pokémon nearby...".magenta());
    }
}

fn show_rare(event: &EncounterEvent, total_finds: u64, species_count: u64, mute: bool) {
    if !mute {
        print!("\x07");
        let _ = std::io::stdout().flush();
    }
    let banner = format!(
        "Congrats!!! You found a shiny {} ({}) after {} encounters!",
        event.name, event.rarity, event.sequence
    );
    println!("{}", banner.yellow().bold());
    println!(
        "Shiny Pokémon Found: {} (shiny {} #{})",
        total_finds, event.name, species_count
    );
}
