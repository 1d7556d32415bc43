use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::debug;

use porthole::config::PortholeConfig;
use porthole::container::DockerInspector;
use porthole::container::service::{HealthReport, check_health, list_containers};
use porthole::version::image::extract_tag;
use porthole::version::registries::DockerHubRegistry;
use porthole::version::registry::Registry;
use porthole::version::resolver::VersionResolver;

#[derive(Parser)]
#[command(name = "porthole")]
#[command(version, about = "Container version and update checks against Docker Hub")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve current version, latest version and update availability of a container
    Resolve {
        /// Container id or name
        container: String,
    },
    /// List containers that publish at least one host port
    List {
        /// Include stopped containers
        #[arg(long)]
        all: bool,
        /// Include containers without published ports
        #[arg(long)]
        include_without_ports: bool,
    },
    /// Check that the container engine is reachable
    Health,
    /// Print the highest release tag published for an image
    Latest {
        /// Image reference (e.g., "nginx:1.25")
        image: String,
    },
    /// Print the manifest digest the registry serves for an image tag
    Digest {
        /// Image reference (e.g., "nginx:1.25")
        image: String,
        /// Tag to look up; defaults to the image's own tag
        #[arg(long)]
        tag: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = PortholeConfig::load(cli.config.as_deref())?;
    let _guard = porthole::logging::init(&config.log)?;
    debug!("Loaded configuration: {:?}", config);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli.command, config))
}

async fn run(command: Command, config: PortholeConfig) -> anyhow::Result<()> {
    let registry = Arc::new(DockerHubRegistry::new(&config.registry)?);

    let output = match command {
        Command::Resolve { container } => {
            let inspector = Arc::new(DockerInspector::connect(&config.docker)?);
            let resolver = VersionResolver::new(inspector, registry);
            serde_json::to_string_pretty(&resolver.resolve(&container).await?)?
        }
        Command::List {
            all,
            include_without_ports,
        } => {
            let engine = DockerInspector::connect(&config.docker)?;
            let containers = list_containers(&engine, include_without_ports, all).await?;
            serde_json::to_string_pretty(&containers)?
        }
        Command::Health => {
            let report = match DockerInspector::connect(&config.docker) {
                Ok(engine) => check_health(&engine).await,
                Err(e) => HealthReport::down(e.to_string()),
            };
            serde_json::to_string(&report)?
        }
        Command::Latest { image } => serde_json::to_string(&registry.latest_version(&image).await)?,
        Command::Digest { image, tag } => {
            let tag = tag.as_deref().unwrap_or_else(|| extract_tag(&image));
            serde_json::to_string(&registry.digest(&image, tag).await)?
        }
    };

    println!("{}", output);
    Ok(())
}
