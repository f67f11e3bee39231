//! Waypoint runtime binary.
//!
//! Serves the teleport request lifecycle over a line-oriented console
//! protocol (one session standing in for a host environment):
//!
//! ```text
//! join <name>                    connect a participant
//! leave <name>                   disconnect a participant
//! move <name> <world> <x> <y> <z>  reposition a participant
//! <name> <command...>            run a command as that participant
//! ```
//!
//! Commands are `tpa <player>`, `tpaccept [player]`, `tpdeny [player]` and
//! `tpacancel [player|all]`. Lifecycle notifications are printed as they
//! are published.

use anyhow::Context;
use shared_types::{Position, WorldId};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use waypoint_runtime::commands::render_notification;
use waypoint_runtime::{telemetry, Runtime, RuntimeConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("waypoint.toml"));
    let config = RuntimeConfig::load(&path)
        .with_context(|| format!("loading config from {}", path.display()))?;

    telemetry::init(&config.log.filter);

    let engine_config = config.engine_config();
    tracing::info!(
        timeout_secs = engine_config.request_timeout.as_secs(),
        cooldown_secs = engine_config.request_cooldown.as_secs(),
        cross_world = engine_config.allow_cross_world,
        "waypoint runtime starting"
    );

    let mut runtime = Runtime::build(engine_config);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut maintenance = tokio::time::interval(std::time::Duration::from_secs(60));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line.context("reading stdin")? {
                    Some(line) => handle_line(&mut runtime, line.trim()),
                    None => break,
                }
            }
            Some(due) = runtime.expirations.recv() => {
                runtime.commands.apply_expiration(due);
            }
            notification = runtime.notifications.recv() => {
                if let Ok(notification) = notification {
                    if runtime.roster.knows(notification.recipient) {
                        println!(
                            "[{}] {}",
                            runtime.roster.name_of(notification.recipient),
                            render_notification(&runtime.roster, &notification)
                        );
                    }
                }
            }
            _ = maintenance.tick() => {
                runtime.commands.run_maintenance();
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupt received");
                break;
            }
        }
    }

    runtime.commands.shutdown();
    tracing::info!("waypoint runtime stopped");
    Ok(())
}

fn handle_line(runtime: &mut Runtime, line: &str) {
    if line.is_empty() {
        return;
    }
    let mut parts = line.splitn(2, ' ');
    let head = parts.next().unwrap_or_default();
    let rest = parts.next().unwrap_or_default().trim();

    match head {
        "join" if !rest.is_empty() => {
            runtime.roster.join(rest);
            println!("* {} joined", rest);
        }
        "leave" if !rest.is_empty() => match runtime.roster.lookup(rest) {
            Some(id) => {
                runtime.roster.leave(id);
                println!("* {} left", rest);
            }
            None => println!("! unknown participant: {}", rest),
        },
        "move" => handle_move(runtime, rest),
        name => {
            let Some(who) = runtime.roster.lookup(name) else {
                println!("! unknown participant: {}", name);
                return;
            };
            if rest.is_empty() {
                println!("! expected a command after the participant name");
                return;
            }
            for reply in runtime.commands.handle(who, rest) {
                println!("[{}] {}", name, reply);
            }
        }
    }
}

fn handle_move(runtime: &mut Runtime, rest: &str) {
    let parts: Vec<&str> = rest.split_whitespace().collect();
    let parsed = match parts.as_slice() {
        [name, world, x, y, z] => {
            match (x.parse::<f64>(), y.parse::<f64>(), z.parse::<f64>()) {
                (Ok(x), Ok(y), Ok(z)) => Some((*name, *world, x, y, z)),
                _ => None,
            }
        }
        _ => None,
    };
    let Some((name, world, x, y, z)) = parsed else {
        println!("! usage: move <name> <world> <x> <y> <z>");
        return;
    };
    let Some(id) = runtime.roster.lookup(name) else {
        println!("! unknown participant: {}", name);
        return;
    };
    runtime
        .roster
        .move_to(id, Position::new(WorldId::new(world), x, y, z));
    println!("* {} moved to {}", name, world);
}
