use fra_atlas::cli::run_atlas_demo_cli;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    run_atlas_demo_cli()
}
