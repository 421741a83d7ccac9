//! CLI entry point for lawsite

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lawsite::content::ContentKind;

#[derive(Parser)]
#[command(name = "lawsite")]
#[command(version)]
#[command(about = "Markdown-driven website server for a law practice", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post or page
    New {
        /// Kind of document (post, page)
        #[arg(short, long, default_value = "post")]
        kind: String,

        /// Title of the new document
        title: String,
    },

    /// Render a Markdown file and print its metadata and sanitized HTML
    Render {
        /// File to render
        file: PathBuf,

        /// Print a single JSON object instead
        #[arg(long)]
        json: bool,
    },

    /// Start the site server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Static mode (no file watching or live reload)
        #[arg(long)]
        r#static: bool,
    },

    /// List site content
    List {
        /// Type of content to list (posts, pages, settings)
        #[arg(default_value = "posts")]
        r#type: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        "lawsite=debug,tower_http=debug,info"
    } else {
        "lawsite=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            lawsite::commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::New { kind, title } => {
            let site = lawsite::Site::new(&base_dir)?;
            let kind: ContentKind = kind.parse()?;
            tracing::info!("Creating new {} with title: {}", kind.dir_name(), title);
            lawsite::commands::new::run(&site, &title, kind)?;
        }

        Commands::Render { file, json } => {
            let site = lawsite::Site::new(&base_dir)?;
            let file = if file.is_absolute() {
                file
            } else {
                base_dir.join(file)
            };
            lawsite::commands::render::run(&site, &file, json)?;
        }

        Commands::Server {
            port,
            ip,
            open,
            r#static,
        } => {
            let site = lawsite::Site::new(&base_dir)?;
            if site.config.oauth.client_id.is_none() {
                tracing::warn!(
                    "No OAuth client id configured; CMS login at /api/auth is disabled"
                );
            }
            tracing::info!("Starting server at http://{}:{}", ip, port);
            lawsite::server::start(&site, &ip, port, !r#static, open).await?;
        }

        Commands::List { r#type } => {
            let site = lawsite::Site::new(&base_dir)?;
            lawsite::commands::list::run(&site, &r#type)?;
        }

        Commands::Version => {
            println!("lawsite version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
