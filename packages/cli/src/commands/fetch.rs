use anyhow::Result;
use clap::Args;
use colored::Colorize;
use prerender_runtime::{CssMode, HttpFetcher, LazyLoader, LoaderConfig, MemoryDocument};
use std::sync::Arc;
use std::time::Duration;

const MOUNT: &str = "#prerender-target";

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Component name (fragment `{name}.html`)
    pub name: String,

    /// URL the fragments are served from
    #[arg(long, default_value = "http://localhost:4321/components")]
    pub base_url: String,

    /// Load per-component stylesheets through the manifest
    #[arg(long)]
    pub per_component: bool,

    #[arg(long, default_value = "3")]
    pub retries: u32,

    /// Base retry delay in milliseconds
    #[arg(long, default_value = "1000")]
    pub retry_delay: u64,

    /// Print load statistics as JSON
    #[arg(long)]
    pub stats: bool,
}

pub fn fetch(args: FetchArgs) -> Result<()> {
    let config = LoaderConfig {
        css_mode: if args.per_component { CssMode::PerComponent } else { CssMode::Legacy },
        retry_attempts: args.retries,
        retry_delay: Duration::from_millis(args.retry_delay),
        ..LoaderConfig::new(args.base_url.clone())
    };

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let document = Arc::new(MemoryDocument::new().with_mount(MOUNT));
        let loader = LazyLoader::new(config, Arc::new(HttpFetcher::new()), document.clone());

        loader.inject(&args.name, MOUNT).await?;

        for href in document.stylesheets() {
            eprintln!("  {} {}", "✓".green(), href.dimmed());
        }
        println!("{}", document.inner_html(MOUNT).unwrap_or_default());

        if args.stats {
            eprintln!("{}", serde_json::to_string_pretty(&loader.stats())?);
        }
        Ok::<_, anyhow::Error>(())
    })
}
