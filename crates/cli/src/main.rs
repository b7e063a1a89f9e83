use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

#[derive(Parser, Debug)]
#[command(name = "shelf")]
#[command(about = "Shelf books site", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to bind to (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the site routes and module mount points
    Routes,
    /// Print the effective settings as JSON
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load shelf settings")?;

    shelf_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            serve(&settings).await
        }
        Commands::Routes => {
            let registry = shelf_app::build_registry()?;
            print_routes(&registry, &settings);
            Ok(())
        }
        Commands::Config => {
            let rendered = serde_json::to_string_pretty(&settings)
                .context("failed to render settings")?;
            println!("{rendered}");
            Ok(())
        }
    }
}

async fn serve(settings: &Settings) -> anyhow::Result<()> {
    tracing::info!(env = ?settings.environment, "shelf bootstrap starting");

    let registry = shelf_app::build_registry()?;
    let ctx = InitCtx { settings };

    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let served = shelf_http::start_server(&registry, settings).await;

    let stopped = registry.stop_all().await;
    served?;
    stopped?;

    tracing::info!("shelf shut down cleanly");
    Ok(())
}

fn print_routes(registry: &ModuleRegistry, settings: &Settings) {
    println!("GET /        -> 302 {}", settings.site.home_path);
    println!("GET /healthz");
    println!("GET {}", shelf_http::router::OPENAPI_PATH);
    for module in registry.modules() {
        println!(
            "{}  (module {})",
            shelf_http::router::mount_path(module.name()),
            module.name()
        );
    }
}
