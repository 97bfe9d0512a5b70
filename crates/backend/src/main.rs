use anyhow::Context;
use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use backend::api::handlers::d100_sales_overview::DashboardState;
use backend::dashboards::d100_sales_overview::service;
use backend::projections::p100_sales_enriched;
use backend::shared::config::{load_config, Config};
use backend::shared::format::{format_money, format_number, format_percent};
use backend::usecases::{
    u100_generate_dataset, u101_generate_customers, u102_generate_products, u103_generate_sales,
};
use clap::{Parser, Subcommand};
use contracts::dashboards::d100_sales_overview::SalesOverviewRequest;
use contracts::enums::GenerationStrategy;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "ventas-bi", version, about = "Synthetic sales dataset and BI dashboard")]
struct Cli {
    /// Path to config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the generation seed
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Override the number of transactions
    #[arg(long, global = true)]
    transactions: Option<usize>,

    /// catalog_sampling | dimension_join
    #[arg(long, global = true, value_parser = parse_strategy)]
    strategy: Option<GenerationStrategy>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate all tables and the enriched transaction table
    Generate,
    /// Generate clientes.csv
    Customers,
    /// Generate productos.csv
    Products,
    /// Generate ventas_empresa.csv from the existing customer and product tables
    Sales,
    /// Rebuild ventas_limpias.csv from the raw tables
    Enrich,
    /// Print the dashboard KPIs
    Summary {
        /// Comma-separated segments; omit for all
        #[arg(long)]
        segmento: Option<String>,
    },
    /// Serve the dashboard API
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
}

fn parse_strategy(value: &str) -> Result<GenerationStrategy, String> {
    GenerationStrategy::from_code(value)
        .ok_or_else(|| format!("unknown strategy '{value}' (catalog_sampling, dimension_join)"))
}

fn init_tracing() -> anyhow::Result<()> {
    let log_dir = std::path::Path::new("target").join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("backend.log"))?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(seed) = cli.seed {
        config.generation.seed = seed;
    }
    if let Some(transactions) = cli.transactions {
        config.generation.transactions = transactions;
    }
    if let Some(strategy) = cli.strategy {
        config.generation.strategy = strategy;
    }

    match cli.command {
        Command::Generate => {
            let report = u100_generate_dataset::execute(&config)?;
            for table in report.tables() {
                println!(
                    "{:>8} rows  {}  {}",
                    format_number(table.rows as u64),
                    table.sha256,
                    table.path.display()
                );
            }
        }
        Command::Customers => {
            u101_generate_customers::execute(&config)?;
        }
        Command::Products => {
            u102_generate_products::execute(&config)?;
        }
        Command::Sales => {
            u103_generate_sales::execute_from_tables(&config)?;
        }
        Command::Enrich => {
            p100_sales_enriched::rebuild(&config)?;
        }
        Command::Summary { segmento } => print_summary(&config, segmento)?,
        Command::Serve { port } => serve(&config, port.unwrap_or(config.server.port)).await?,
    }

    Ok(())
}

fn print_summary(config: &Config, segmentos: Option<String>) -> anyhow::Result<()> {
    let path = config.data.enriched_sales_path();
    let overview = service::get_sales_overview(&path, &SalesOverviewRequest { segmentos })
        .with_context(|| format!("cannot build summary from {}", path.display()))?;

    println!("Ingresos totales: {}", format_money(overview.kpis.total_revenue));
    println!("Ganancia total:   {}", format_money(overview.kpis.total_profit));
    println!("Margen promedio:  {}", format_percent(overview.kpis.avg_margin_pct));
    println!(
        "Filas:            {} (sin fecha válida: {})",
        format_number(overview.filtered_rows as u64),
        overview.unparsable_rows
    );
    println!();
    println!("Top clientes por ingreso:");
    for row in &overview.top_customers {
        let id = row
            .customer_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "—".to_string());
        println!("{:>3}. {:>6}  {}", row.rank, id, format_money(row.revenue));
    }

    Ok(())
}

// Logs method, path, status, latency and response size
async fn request_logger(req: Request<Body>, next: Next) -> Response {
    use axum::body::to_bytes;

    let start = std::time::Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    // Buffer the body to report its real size
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(
                "{:>5}ms | {:>12} | {} {:>6} {} ({})",
                start.elapsed().as_millis(),
                "error",
                parts.status.as_u16(),
                method,
                uri.path(),
                e
            );
            return Response::from_parts(parts, Body::default());
        }
    };

    tracing::info!(
        "{:>5}ms | {:>12} | {} {:>6} {}",
        start.elapsed().as_millis(),
        format_number(bytes.len() as u64),
        parts.status.as_u16(),
        method,
        uri.path()
    );

    Response::from_parts(parts, Body::from(bytes))
}

async fn serve(config: &Config, port: u16) -> anyhow::Result<()> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let state = DashboardState {
        enriched_sales_path: config.data.enriched_sales_path(),
    };
    let app = backend::routes::configure_routes(state)
        .layer(middleware::from_fn(request_logger))
        .layer(cors);

    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", port, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
