mod app;
mod cli;
mod color;
mod data;
mod export;
mod state;
mod ui;

use anyhow::Context;
use app::DigestDashboardApp;
use clap::Parser;
use cli::Args;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if let Some(path) = &args.export {
        return run_export(&args, path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    let source = args.data.clone();
    eframe::run_native(
        "Digest Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(DigestDashboardApp::new(&source)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard window: {e}"))
}

/// Headless mode: load, filter once, write CSV.
fn run_export(args: &Args, path: &std::path::Path) -> anyhow::Result<()> {
    let digest = data::loader::load_source(&args.data)
        .with_context(|| format!("loading digest from {}", args.data))?;
    let output = data::filter::apply(&digest, &args.criteria());
    export::export_csv(path, output.visible.iter().map(|&i| &digest.articles[i]))?;
    Ok(())
}
