//! # Marco CLI
//!
//! Command-line interface for decorative photo frames.
//!
//! ## Usage
//!
//! ```bash
//! # List available frames
//! marco frames
//!
//! # Frame a local photo
//! marco frame photo.jpg --frame party --output framed.png
//!
//! # Frame a remote photo with captions and a fixed layout
//! marco frame https://example.com/beach.jpg --frame tropical \
//!     --title "Summer 2024" --subtitle "Boracay" --seed 42 --output beach.png
//!
//! # Start the HTTP service, keeping feedback on disk
//! marco serve --listen 0.0.0.0:8080 --data feedback.json
//! ```

use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use marco::{
    MarcoError,
    config::{CatalogSource, ServerConfig},
    render::{Compositor, HttpImageLoader, ImageSource, RenderRequest},
    server,
};

/// Marco - Decorative photo frames
#[derive(Parser, Debug)]
#[command(name = "marco")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Which frame catalog to use.
#[derive(Args, Debug)]
struct CatalogArgs {
    /// Load frames from a JSON file
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Use the classic catalog (classic, modern, vintage, elegant, gold)
    #[arg(long)]
    classic: bool,
}

impl CatalogArgs {
    fn source(self) -> CatalogSource {
        CatalogSource::from_flags(self.catalog, self.classic)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List available frames
    Frames {
        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Frame a single photo and save it as PNG
    Frame {
        /// Photo path or http(s) URL
        input: String,

        /// Frame id
        #[arg(long, short, default_value = "celebration")]
        frame: String,

        /// Output PNG path
        #[arg(long, short, value_name = "FILE")]
        output: PathBuf,

        /// Caption title
        #[arg(long)]
        title: Option<String>,

        /// Caption subtitle
        #[arg(long)]
        subtitle: Option<String>,

        /// Seed for the decoration layout (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Start the HTTP service
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8080")]
        listen: String,

        /// Feedback JSON file (in-memory if omitted)
        #[arg(long, value_name = "FILE")]
        data: Option<PathBuf>,

        /// Webhook that sends notification emails (log only if omitted)
        #[arg(long, value_name = "URL", requires = "recipient")]
        notify_url: Option<String>,

        /// Notification recipient
        #[arg(long, value_name = "EMAIL")]
        recipient: Option<String>,

        #[command(flatten)]
        catalog: CatalogArgs,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "marco=info,tower_http=info".into()))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), MarcoError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Frames { catalog } => {
            let catalog = catalog.source().load()?;
            println!("Available frames:");
            for (id, spec) in catalog.iter() {
                println!("  {:<12} border {:>3}px  accent {}", id, spec.border_width, spec.accent);
            }
            Ok(())
        }

        Commands::Frame {
            input,
            frame,
            output,
            title,
            subtitle,
            seed,
            catalog,
        } => {
            let catalog = catalog.source().load()?;
            if catalog.get(&frame).is_none() {
                tracing::warn!(frame = %frame, "unknown frame, rendering without one");
            }

            let compositor = Compositor::new(Arc::new(catalog));
            let loader = HttpImageLoader::new()?;
            let mut request = RenderRequest::new(ImageSource::parse(&input), frame);
            request.caption_title = title;
            request.caption_subtitle = subtitle;

            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            let surface = compositor.load_and_render(&request, &loader, &mut rng).await?;
            std::fs::write(&output, surface.to_png()?)?;

            let (w, h) = surface.size();
            println!("Saved {}x{} image to {}", w, h, output.display());
            if let Some(region) = surface.hit_region {
                println!("Download control at {}", region.to_header_value());
            }
            Ok(())
        }

        Commands::Serve {
            listen,
            data,
            notify_url,
            recipient,
            catalog,
        } => {
            let config = ServerConfig {
                listen_addr: listen,
                catalog: catalog.source(),
                data_path: data,
                notify_url,
                recipient,
            };
            server::serve(config).await
        }
    }
}
