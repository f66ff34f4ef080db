//! Deepkeep - headless dungeon runner
//!
//! Runs the simulation on the main thread and drains its mailboxes on a
//! render thread and a network thread. Dropping the simulation closes both
//! mailboxes, which is how the consumer threads learn to stop.

use std::path::PathBuf;
use std::sync::PoisonError;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use deepkeep::core::config::SimulationConfig;
use deepkeep::core::error::Result;
use deepkeep::entity::class::ClassCatalog;
use deepkeep::mailbox::{MailboxReceiver, Outbox, RenderRequest, ServerNotification};
use deepkeep::simulation::Simulation;
use deepkeep::spatial::GridPlanner;
use deepkeep::world::map::{SharedMap, TileMap};

const DEFAULT_MAP: &str = "\
##########
#....#***#
#....#*$*#
#....##*##
#........#
#..~~....#
##########";

const DEFAULT_CREATURES: &str = "\
Kobold Digger 2 2 0 1
Kobold autoname 3 4 0 1
Goblin autoname 7 4 0 2
";

/// Deepkeep - run the dungeon simulation headless
#[derive(Parser, Debug)]
#[command(name = "deepkeep")]
#[command(about = "Run the creature simulation with render and network consumers")]
struct Args {
    /// Number of ticks to simulate
    #[arg(long, default_value_t = 200)]
    ticks: u64,

    /// Simulation config (TOML); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Creature class catalog (TOML `[[class]]` tables)
    #[arg(long)]
    classes: Option<PathBuf>,

    /// ASCII tile map
    #[arg(long)]
    map: Option<PathBuf>,

    /// Creature lines: `class name x y z color`
    #[arg(long)]
    creatures: Option<PathBuf>,

    /// Override the config's RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Run without a network thread
    #[arg(long)]
    offline: bool,

    /// Do not sleep between ticks
    #[arg(long)]
    fast: bool,

    /// Node expansions before a path search gives up
    #[arg(long, default_value_t = 4096)]
    max_expansions: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("deepkeep=info")),
        )
        .init();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let classes = match &args.classes {
        Some(path) => ClassCatalog::load_from_toml(path)?,
        None => ClassCatalog::with_defaults(),
    };
    let map = match &args.map {
        Some(path) => TileMap::from_ascii(&std::fs::read_to_string(path)?)?,
        None => TileMap::from_ascii(DEFAULT_MAP)?,
    };
    let creatures = match &args.creatures {
        Some(path) => std::fs::read_to_string(path)?,
        None => DEFAULT_CREATURES.to_string(),
    };

    let (outbox, render_rx, network_rx) = if args.offline {
        let (outbox, render_rx) = Outbox::offline();
        (outbox, render_rx, None)
    } else {
        let (outbox, inbox) = Outbox::connected();
        (outbox, inbox.render, Some(inbox.network))
    };

    let mut sim = Simulation::new(config, map, classes, outbox)?
        .with_planner(GridPlanner::new(args.max_expansions));
    let shared = sim.shared_map();

    let render = thread::Builder::new()
        .name("render".into())
        .spawn(move || render_loop(render_rx, shared))?;
    let network = match network_rx {
        Some(rx) => Some(
            thread::Builder::new()
                .name("network".into())
                .spawn(move || network_loop(rx))?,
        ),
        None => None,
    };

    sim.load_creatures(&creatures)?;

    tracing::info!(
        ticks = args.ticks,
        creatures = sim.creatures().len(),
        seed = sim.config().seed,
        "Deepkeep starting..."
    );

    let tick_length = Duration::from_secs_f64(1.0 / f64::from(sim.config().tick_rate_hz));
    let dt = tick_length.as_secs_f64();
    let mut outcome = Ok(());

    for _ in 0..args.ticks {
        let started = Instant::now();
        if let Err(e) = sim.tick(dt) {
            tracing::error!(tick = sim.current_tick(), error = %e, "simulation halted");
            outcome = Err(e);
            break;
        }
        if !args.fast {
            if let Some(rest) = tick_length.checked_sub(started.elapsed()) {
                thread::sleep(rest);
            }
        }
    }

    tracing::info!(tick = sim.current_tick(), "simulation finished");
    print!("{}", sim.save_creatures());

    // Closes both mailboxes
    drop(sim);

    match render.join() {
        Ok(handled) => tracing::info!(handled, "render thread stopped"),
        Err(_) => tracing::error!("render thread panicked"),
    }
    if let Some(network) = network {
        match network.join() {
            Ok(sent) => tracing::info!(sent, "network thread stopped"),
            Err(_) => tracing::error!("network thread panicked"),
        }
    }

    outcome
}

/// Stand-in renderer: applies nothing, only reports what it would draw
fn render_loop(rx: MailboxReceiver<RenderRequest>, map: SharedMap) -> usize {
    let mut handled = 0;
    while let Some(batch) = rx.recv_batch(Duration::from_millis(50)) {
        for request in batch {
            handled += 1;
            match request {
                RenderRequest::RefreshTile { coord } => {
                    let tiles = map.read().unwrap_or_else(PoisonError::into_inner);
                    if let Some(tile) = tiles.get_tile(coord) {
                        tracing::trace!(%coord, mesh = tile.mesh_name(), fullness = tile.fullness(), "refresh tile");
                    }
                }
                RenderRequest::CreateMesh { name, mesh, .. } => {
                    tracing::debug!(%name, %mesh, "create mesh");
                }
                RenderRequest::DestroyMesh { name, .. } => {
                    tracing::debug!(%name, "destroy mesh");
                }
                other => tracing::trace!(?other, "render request"),
            }
        }
    }
    handled
}

/// Stand-in server: serializes each notification as it would go on the wire
fn network_loop(rx: MailboxReceiver<ServerNotification>) -> usize {
    let mut sent = 0;
    while let Some(batch) = rx.recv_batch(Duration::from_millis(50)) {
        for notification in batch {
            match serde_json::to_string(&notification) {
                Ok(line) => {
                    sent += 1;
                    tracing::trace!(%line, "broadcast");
                }
                Err(e) => tracing::warn!(error = %e, "could not encode notification"),
            }
        }
    }
    sent
}
