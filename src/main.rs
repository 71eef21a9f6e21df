//! CLI entry point for cosmic-blog

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cosmic-blog")]
#[command(version)]
#[command(about = "A server-rendered blog front end for a Cosmic bucket", long_about = None)]
struct Cli {
    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the blog server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Verify the bucket is reachable and report content counts
    Check,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Bucket credentials may live in a local .env
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.debug {
        "cosmic_blog=debug,info"
    } else {
        "cosmic_blog=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = std::env::current_dir()?;

    match cli.command {
        Commands::Serve { port, ip } => {
            let blog = cosmic_blog::Blog::new(&base_dir)?;
            tracing::info!("starting server at http://{}:{}", ip, port);
            blog.serve(&ip, port).await?;
        }

        Commands::Check => {
            let blog = cosmic_blog::Blog::new(&base_dir)?;
            let (posts, authors, categories) = tokio::try_join!(
                blog.store.all_posts(),
                blog.store.all_authors(),
                blog.store.all_categories()
            )?;
            println!(
                "bucket reachable: {} posts, {} authors, {} categories",
                posts.len(),
                authors.len(),
                categories.len()
            );
        }

        Commands::Version => {
            println!("cosmic-blog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
