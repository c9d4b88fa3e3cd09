use anyhow::Result;
use clap::Args;
use colored::Colorize;
use prerender_pipeline::{Config, DEFAULT_CONFIG_NAME};
use std::fs;
use std::path::Path;

const EXAMPLE_COMPONENT: &str = r#"---
const title = "Hello from a prerendered component";
---
<section class="p-4 text-center">
  <h2 class="font-bold">{title}</h2>
  <slot />
</section>

<style>
  section { border-radius: 8px; }
</style>
"#;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Components directory
    #[arg(long, default_value = "src/components")]
    pub components_dir: String,

    /// Output directory for fragments and stylesheets
    #[arg(long, default_value = "public/components")]
    pub output_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, root: &Path) -> Result<()> {
    let config_path = root.join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!("{} {} already exists", "⚠️".yellow(), DEFAULT_CONFIG_NAME.bright_white());
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing prerender project...".bright_blue().bold());

    let config = Config {
        components_dir: args.components_dir.clone(),
        output_dir: args.output_dir.clone(),
        ..Config::default()
    };

    let components_dir = config.components_dir(root);
    if !components_dir.exists() {
        fs::create_dir_all(&components_dir)?;
        println!("  {} Created {}/", "✓".green(), args.components_dir);
    }

    let example = components_dir.join("Hello.astro");
    if !example.exists() {
        fs::write(&example, EXAMPLE_COMPONENT)?;
        println!("  {} Created {}/Hello.astro", "✓".green(), args.components_dir);
    }

    fs::write(&config_path, config.to_json())?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Add components to {}/", args.components_dir);
    println!("  2. Run: prerender build");
    println!("  3. Check output in {}/", args.output_dir);

    Ok(())
}
