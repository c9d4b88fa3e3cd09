use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use prerender_compiler_html::{RenderError, RendererKind};
use prerender_parser::error::pretty;
use prerender_pipeline::{ComponentOutcome, Config, Orchestrator, PassReport, PipelineError};
use std::path::Path;

#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Renderer override (structural, full)
    #[arg(short, long)]
    pub renderer: Option<RendererKind>,

    /// Write fragments without minifying
    #[arg(long)]
    pub no_minify: bool,
}

pub fn load_config(root: &Path, renderer: Option<RendererKind>, no_minify: bool) -> Result<Config> {
    let mut config = Config::load(root)?;
    if let Some(renderer) = renderer {
        config.renderer = renderer;
    }
    if no_minify {
        config.minify = false;
    }
    Ok(config)
}

pub fn build(args: BuildArgs, root: &Path) -> Result<()> {
    let config = load_config(root, args.renderer, args.no_minify)?;
    let mut orchestrator = Orchestrator::new(root, config)?;

    println!("{}", "🔨 Prerendering components...".bright_blue().bold());
    let report = orchestrator.run_pass()?;
    print_report(&report, orchestrator.components_dir());

    if report.failed() > 0 {
        return Err(anyhow!("{} component(s) failed to prerender", report.failed()));
    }
    Ok(())
}

pub fn print_report(report: &PassReport, components_dir: &Path) {
    if report.components.is_empty() {
        println!("{}", "⚠️  No components found".yellow());
        return;
    }

    for component in &report.components {
        let relative = component.path.strip_prefix(components_dir).unwrap_or(&component.path);
        match &component.outcome {
            ComponentOutcome::Cached => {
                println!("  {} {} {}", "✓".green(), relative.display(), "(cached)".dimmed());
            }
            ComponentOutcome::Written { fragment, renderer } => {
                println!(
                    "  {} {} → {} {}",
                    "✓".green(),
                    relative.display(),
                    fragment.display(),
                    format!("[{}]", renderer).dimmed()
                );
            }
            ComponentOutcome::Failed(error) => {
                eprintln!("  {} {} - {}", "✗".red(), relative.display(), describe(error).red());
            }
        }
    }

    println!();
    if report.failed() == 0 {
        println!(
            "{} {} written, {} cached",
            "✅".green(),
            report.written(),
            report.cached()
        );
    } else {
        println!(
            "{} {} written, {} cached, {} failed",
            "⚠️".yellow(),
            report.written(),
            report.cached(),
            report.failed()
        );
    }
}

/// Parse failures get a source excerpt; everything else its message
fn describe(error: &PipelineError) -> String {
    match error {
        PipelineError::Render {
            source: RenderError::Parse {
                path,
                source_text,
                error,
            },
            ..
        } => {
            let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("unknown");
            format!("\n{}", pretty::format_error(error, file_name, source_text))
        }
        other => other.to_string(),
    }
}
