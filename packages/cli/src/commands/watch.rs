use super::build::{load_config, print_report};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use prerender_compiler_html::RendererKind;
use prerender_pipeline::{Orchestrator, DEFAULT_DEBOUNCE};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Renderer override (structural, full)
    #[arg(short, long)]
    pub renderer: Option<RendererKind>,

    /// Coalescing window for file events, in milliseconds
    #[arg(long)]
    pub debounce: Option<u64>,
}

pub fn watch(args: WatchArgs, root: &Path) -> Result<()> {
    let config = load_config(root, args.renderer, false)?;
    let mut orchestrator = Orchestrator::new(root, config)?;

    println!("{}", "🔨 Prerendering components...".bright_blue().bold());
    let report = orchestrator.run_pass()?;
    print_report(&report, orchestrator.components_dir());

    println!();
    println!(
        "{} {}",
        "👀 Watching".bright_blue(),
        orchestrator.components_dir().display()
    );

    let debounce = args.debounce.map(Duration::from_millis).unwrap_or(DEFAULT_DEBOUNCE);
    orchestrator.watch(debounce)?;
    Ok(())
}
