//! Trolley Application CLI

use std::process;

use clap::{Args, Parser, Subcommand};
use jiff::{SignedDuration, Timestamp};
use rust_decimal::Decimal;
use rusty_money::iso;
use tracing_subscriber::EnvFilter;
use trolley::{lifecycle::LifecyclePolicy, products::ProductId};
use trolley_app::{
    context::AppContext,
    database,
    domain::products::{NewProduct, ProductCatalog},
};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "trolley-app", about = "Trolley CLI", long_about = None)]
struct Cli {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,

    /// Manage the product catalog
    Product(ProductCommand),

    /// Run a single cart lifecycle sweep
    Sweep(SweepArgs),
}

#[derive(Debug, Args)]
struct ProductCommand {
    #[command(subcommand)]
    command: ProductSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductSubcommand {
    /// Add a product
    Create(CreateProductArgs),

    /// List all products
    List,
}

#[derive(Debug, Args)]
struct CreateProductArgs {
    /// Product display name
    #[arg(long)]
    name: String,

    /// Unit price in major units, e.g. 1.99
    #[arg(long)]
    price: Decimal,

    /// Optional product UUID; generated when omitted
    #[arg(long)]
    product_uuid: Option<Uuid>,
}

#[derive(Debug, Args)]
struct SweepArgs {
    /// Minutes of inactivity before an active cart is abandoned
    #[arg(
        long,
        env = "CART_ACTIVE_TIMEOUT_MINUTES",
        default_value_t = 180,
        value_parser = clap::value_parser!(i64).range(1..=525_600)
    )]
    active_timeout_minutes: i64,

    /// Hours an abandoned cart is kept before it is purged
    #[arg(
        long,
        env = "CART_ABANDONED_RETENTION_HOURS",
        default_value_t = 168,
        value_parser = clap::value_parser!(i64).range(1..=87_600)
    )]
    abandoned_retention_hours: i64,
}

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let database_url = cli
        .database_url
        .ok_or_else(|| "DATABASE_URL is required".to_string())?;

    match cli.command {
        Commands::Migrate => migrate(&database_url).await,
        Commands::Product(ProductCommand {
            command: ProductSubcommand::Create(args),
        }) => create_product(&database_url, args).await,
        Commands::Product(ProductCommand {
            command: ProductSubcommand::List,
        }) => list_products(&database_url).await,
        Commands::Sweep(args) => sweep(&database_url, &args).await,
    }
}

async fn connect(database_url: &str) -> Result<AppContext, String> {
    AppContext::from_database_url(database_url, iso::GBP)
        .await
        .map_err(|error| format!("failed to initialise: {error}"))
}

async fn migrate(database_url: &str) -> Result<(), String> {
    let pool = database::connect(database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    database::migrate(&pool)
        .await
        .map_err(|error| format!("failed to run migrations: {error}"))?;

    println!("migrations applied");

    Ok(())
}

async fn create_product(database_url: &str, args: CreateProductArgs) -> Result<(), String> {
    let app = connect(database_url).await?;

    let product = app
        .products
        .create_product(NewProduct {
            id: args
                .product_uuid
                .map_or_else(ProductId::new, ProductId::from_uuid),
            name: args.name,
            unit_price: args.price,
        })
        .await
        .map_err(|error| format!("failed to create product: {error}"))?;

    println!("product_uuid: {}", product.id);
    println!("name: {}", product.name);
    println!("price: {}", product.unit_price);

    Ok(())
}

async fn list_products(database_url: &str) -> Result<(), String> {
    let app = connect(database_url).await?;

    let products = app
        .products
        .list_products()
        .await
        .map_err(|error| format!("failed to list products: {error}"))?;

    for product in products {
        println!("{}\t{}\t{}", product.id, product.unit_price, product.name);
    }

    Ok(())
}

async fn sweep(database_url: &str, args: &SweepArgs) -> Result<(), String> {
    let app = connect(database_url).await?;

    let policy = LifecyclePolicy::new(
        SignedDuration::from_mins(args.active_timeout_minutes),
        SignedDuration::from_hours(args.abandoned_retention_hours),
    );

    let report = app.sweeper(policy).run_once(Timestamp::now()).await;

    println!(
        "abandoned: {}, purged: {}, skipped: {}, failed: {}",
        report.abandoned, report.purged, report.skipped, report.failed
    );

    Ok(())
}
