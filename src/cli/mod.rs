//! Command-line driver: runs the atlas against the headless map and prints
//! the sidebar plus the mounted scene as JSON.

pub mod args;

use std::env;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;

use crate::atlas::{AtlasView, MapPanel, Sidebar};
use crate::config::AtlasConfig;
use crate::features::claim::RawClaim;
use crate::surface::{Container, HeadlessFactory, HeadlessScene};

pub use args::{CliError, DemoArgs, USAGE};

/// Container id used by the demo page.
pub const DEMO_CONTAINER: &str = "atlas-map";

#[derive(Debug, Serialize)]
pub struct DemoReport {
    pub panel: MapPanel,
    pub sidebar: Sidebar,
    pub scene: Option<HeadlessScene>,
}

/// Claims shown when no `--claims` file is given.
pub fn demo_claims() -> Vec<RawClaim> {
    vec![
        RawClaim::new("FRA/CGH/BST/2024/001", 81.2849, 19.1383, "approved")
            .with_beneficiary("Ramesh Kumar", "Kondagaon", 2.5),
        RawClaim::new("FRA/CGH/BST/2024/002", 81.3849, 19.2383, "pending")
            .with_beneficiary("Sunita Devi", "Tokapal", 1.8),
        RawClaim::new("FRA/CGH/KNK/2024/003", 81.1849, 19.0383, "community")
            .with_beneficiary("Mohan Lal", "Bhanupratappur", 3.2),
    ]
}

pub fn load_claims(path: &Path) -> Result<Vec<RawClaim>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading claims from {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing claims in {}", path.display()))
}

/// Build, mount and drive an atlas according to `args`.
pub fn run_demo(args: &DemoArgs) -> Result<DemoReport> {
    let config = match &args.config {
        Some(path) => AtlasConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AtlasConfig::default(),
    };
    let claims = match &args.claims {
        Some(path) => load_claims(path)?,
        None => demo_claims(),
    };

    let mut atlas = AtlasView::new(config, args.role).context("building atlas")?;
    atlas.set_claims(claims);

    let mut factory = HeadlessFactory::new();
    let container = Container::new(DEMO_CONTAINER, 1280, 600);
    let container = (!args.no_container).then_some(&container);
    let mounted = matches!(atlas.mount(&mut factory, container), MapPanel::Map);
    if mounted {
        atlas.on_map_ready();
    }

    if let Some(region) = &args.region {
        atlas.select_region(region);
    }
    if let Some(district) = &args.district {
        atlas.select_sub_region(district);
    }
    if let Some(layer) = &args.layer {
        atlas.select_layer(layer);
    }

    info!("{} renderer call(s) issued", factory.call_count());
    Ok(DemoReport {
        panel: atlas.panel().clone(),
        sidebar: atlas.sidebar(),
        scene: factory.scene(DEMO_CONTAINER),
    })
}

pub fn run_atlas_demo_cli() -> Result<()> {
    let all_args: Vec<String> = env::args().skip(1).collect();
    let args = DemoArgs::parse(&all_args).with_context(|| USAGE.to_string())?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }
    let report = run_demo(&args)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
