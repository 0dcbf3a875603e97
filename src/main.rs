//! Entry point for the soulslike arena demo.

use std::path::PathBuf;

use anyhow::Context;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;
use soulslike::plugin::insert_settings;
use soulslike::{
    init_logging, spawn_world_system, FocusPlugin, GameSettings, InputMappingPlugin,
    PresentationPlugin,
};

/// Third-person arena with soft-lock target focusing
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON file with focus and character tuning
    #[arg(short, long)]
    settings: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let settings = match &args.settings {
        Some(path) => GameSettings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => GameSettings::default(),
    };
    log::info!(
        "focus search radius {} with {:?} ordering",
        settings.focus.search_radius,
        settings.focus.candidate_order
    );

    let mut app = App::new();
    app.add_plugins(DefaultPlugins.build().disable::<LogPlugin>());
    insert_settings(&mut app, &settings);
    app.add_plugins((FocusPlugin, InputMappingPlugin, PresentationPlugin))
        .add_systems(Startup, spawn_world_system);
    app.run();
    Ok(())
}
