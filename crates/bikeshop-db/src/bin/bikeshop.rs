//! # Bikeshop Fixture Loader and Demo Report
//!
//! Loads the bike shop fixtures into SQLite and prints what is in there.
//!
//! ## Usage
//! ```bash
//! # Load ./data into an in-memory database and print the report
//! cargo run -p bikeshop-db --bin bikeshop
//!
//! # Keep the data in a file, read fixtures from elsewhere
//! cargo run -p bikeshop-db --bin bikeshop -- --db ./bikeshop.db --data ./fixtures
//!
//! # Machine-readable report
//! cargo run -p bikeshop-db --bin bikeshop -- --json
//! ```
//!
//! `BIKESHOP_DB_PATH`, `BIKESHOP_DATA_DIR` and `BIKESHOP_MAX_CONNECTIONS`
//! set the defaults; flags win. Logs go to stderr (`RUST_LOG` overrides
//! the filter), the report to stdout.

use std::env;
use std::path::PathBuf;

use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bikeshop_db::repository::brand::BrandRepository;
use bikeshop_db::{
    AppConfig, CatalogEntry, CityCount, ConfigError, Database, DbError, FixtureLoader, OrderTotal,
    Rows, TableCount,
};

/// Rows of the product/category join shown in the report.
const CATALOG_HEAD: usize = 5;

/// The report printed after loading.
#[derive(Debug, Serialize)]
struct Report {
    database: String,
    tables: Vec<TableCount>,
    catalog_head: Vec<CatalogEntry>,
    ca_city_counts: Vec<CityCount>,
    ca_cities_over_four: Vec<CityCount>,
    distinct_cities: i64,
    customers_with_phone: usize,
    customers_without_phone: usize,
    electra_brand_id: i64,
    largest_order: Option<OrderTotal>,
    referenced_brand_delete: String,
}

/// Failures specific to the report binary.
#[derive(Debug, thiserror::Error)]
enum ReportError {
    #[error("Database {0} is partially loaded; remove it and run again")]
    PartiallyLoaded(String),

    #[error("Brand {0} has no products, so deleting it was not refused")]
    UnreferencedBrand(i64),
}

/// How much of the fixture set a database already holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadState {
    Empty,
    Loaded,
    Partial,
}

/// Parsed command-line options.
#[derive(Debug, Default)]
struct Options {
    db_path: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    json: bool,
    help: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let options = parse_args(env::args().skip(1))?;
    if options.help {
        print_help();
        return Ok(());
    }

    let mut config = AppConfig::from_env()?;
    if let Some(path) = options.db_path {
        config.db_path = path;
    }
    if let Some(dir) = options.data_dir {
        config.data_dir = dir;
    }

    let db_config = config.db_config();
    let in_memory = db_config.is_in_memory();
    let db = Database::new(db_config).await?;

    // A file database keeps its rows between runs
    let state = if in_memory {
        LoadState::Empty
    } else {
        load_state(&db.catalog().table_counts().await?)
    };

    match state {
        LoadState::Empty => {
            FixtureLoader::new(db.clone(), config.data_dir.clone())
                .load_all()
                .await?;
        }
        LoadState::Loaded => {
            info!(
                path = %config.db_path.display(),
                "Database already loaded, skipping fixtures"
            );
        }
        LoadState::Partial => {
            db.close().await;
            return Err(ReportError::PartiallyLoaded(config.db_path.display().to_string()).into());
        }
    }

    let report = build_report(&db, &config).await?;
    db.close().await;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

/// Installs the stderr log subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show every repository call
/// - `RUST_LOG=sqlx=info` - Show executed statements
/// - Default: `info,bikeshop=debug,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bikeshop=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Classifies row counts listed in load order.
///
/// The last table loaded decides whether an earlier run finished.
fn load_state(tables: &[TableCount]) -> LoadState {
    if tables.iter().all(|t| t.rows == 0) {
        LoadState::Empty
    } else if tables.last().is_some_and(|t| t.rows > 0) {
        LoadState::Loaded
    } else {
        LoadState::Partial
    }
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options, ConfigError> {
    let mut options = Options::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" | "-d" => {
                let value = args
                    .next()
                    .ok_or_else(|| ConfigError::MissingArgument(arg.clone()))?;
                options.db_path = Some(PathBuf::from(value));
            }
            "--data" => {
                let value = args
                    .next()
                    .ok_or_else(|| ConfigError::MissingArgument(arg.clone()))?;
                options.data_dir = Some(PathBuf::from(value));
            }
            "--json" => options.json = true,
            "--help" | "-h" => options.help = true,
            other => return Err(ConfigError::UnknownArgument(other.to_string())),
        }
    }

    Ok(options)
}

fn print_help() {
    println!("Bikeshop Fixture Loader");
    println!();
    println!("Usage: bikeshop [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -d, --db <PATH>    Database file path (default: in-memory)");
    println!("      --data <DIR>   Fixture directory (default: ./data)");
    println!("      --json         Print the report as JSON");
    println!("  -h, --help         Show this help message");
}

async fn build_report(db: &Database, config: &AppConfig) -> Result<Report, Box<dyn std::error::Error>> {
    let tables = db.catalog().table_counts().await?;

    let mut catalog_head = db.catalog().product_categories().await?;
    catalog_head.truncate(CATALOG_HEAD);

    let customers = db.customers();
    let electra = Rows::from(db.brands().find_by_name("Electra").await?).one()?;
    let largest_order = db.orders().totals().await?.into_iter().next();

    let referenced_brand_delete = attempt_brand_delete(db, electra.brand_id).await?;

    Ok(Report {
        database: config.db_path.display().to_string(),
        tables,
        catalog_head,
        ca_city_counts: customers.city_counts("CA").await?,
        ca_cities_over_four: customers.cities_with_more_than("CA", 4).await?,
        distinct_cities: customers.distinct_city_count().await?,
        customers_with_phone: customers.with_phone().await?.len(),
        customers_without_phone: customers.without_phone().await?.len(),
        electra_brand_id: electra.brand_id,
        largest_order,
        referenced_brand_delete,
    })
}

/// Tries to delete a brand inside a transaction that is always rolled back.
///
/// Returns the message of the error that refused the delete. A delete that
/// goes through is reported as [`ReportError::UnreferencedBrand`].
async fn attempt_brand_delete(
    db: &Database,
    brand_id: i64,
) -> Result<String, Box<dyn std::error::Error>> {
    let mut tx = db
        .pool()
        .begin()
        .await
        .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

    let outcome = BrandRepository::delete_with(&mut *tx, brand_id).await;

    tx.rollback()
        .await
        .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

    match outcome {
        Ok(()) => Err(ReportError::UnreferencedBrand(brand_id).into()),
        Err(e) => Ok(e.to_string()),
    }
}

fn print_report(report: &Report) {
    println!("Bikeshop");
    println!("========");
    println!("Database: {}", report.database);
    println!();

    println!("Rows per table:");
    for count in &report.tables {
        println!("  {:<12} {:>5}", count.table, count.rows);
    }
    println!();

    println!("Catalog (first {} by name, descending):", report.catalog_head.len());
    for entry in &report.catalog_head {
        println!(
            "  {:<45} {:<20} {:>9.2}",
            entry.product_name, entry.category_name, entry.list_price
        );
    }
    println!();

    println!("Customers per California city:");
    for city in &report.ca_city_counts {
        println!("  {:<15} {}", city.city, city.city_count);
    }
    let busy: Vec<_> = report
        .ca_cities_over_four
        .iter()
        .map(|c| c.city.as_str())
        .collect();
    println!("  more than four: {}", busy.join(", "));
    println!();

    println!("Distinct customer cities: {}", report.distinct_cities);
    println!(
        "Customers with phone / without: {} / {}",
        report.customers_with_phone, report.customers_without_phone
    );
    println!("Brand 'Electra' (one row): id {}", report.electra_brand_id);
    if let Some(order) = &report.largest_order {
        println!("Largest order: #{} ({:.2})", order.order_id, order.total);
    }
    println!(
        "Deleting brand 'Electra' (rolled back): {}",
        report.referenced_brand_delete
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use bikeshop_db::repository::catalog::TABLES;
    use bikeshop_db::DbConfig;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        let options = parse_args(args(&["--db", "shop.db", "--data", "fixtures", "--json"])).unwrap();

        assert_eq!(options.db_path, Some(PathBuf::from("shop.db")));
        assert_eq!(options.data_dir, Some(PathBuf::from("fixtures")));
        assert!(options.json);
        assert!(!options.help);
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(matches!(
            parse_args(args(&["--db"])),
            Err(ConfigError::MissingArgument(_))
        ));
        assert!(matches!(
            parse_args(args(&["--count", "5"])),
            Err(ConfigError::UnknownArgument(ref flag)) if flag == "--count"
        ));
    }

    fn counts(rows: [i64; 9]) -> Vec<TableCount> {
        TABLES
            .iter()
            .zip(rows)
            .map(|(&table, rows)| TableCount { table, rows })
            .collect()
    }

    #[test]
    fn test_load_state() {
        assert_eq!(load_state(&counts([0; 9])), LoadState::Empty);
        assert_eq!(
            load_state(&counts([7, 9, 54, 80, 3, 135, 10, 60, 151])),
            LoadState::Loaded
        );
        // Stopped after staff
        assert_eq!(
            load_state(&counts([7, 9, 54, 80, 3, 135, 10, 0, 0])),
            LoadState::Partial
        );
    }

    fn fixture_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data")
    }

    #[tokio::test]
    async fn test_report_leaves_file_database_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bikeshop.db");
        let config = AppConfig {
            db_path: path.clone(),
            ..AppConfig::default()
        };

        let db = Database::bootstrap(config.db_config(), fixture_dir())
            .await
            .unwrap();
        let before = db.catalog().table_counts().await.unwrap();

        for _ in 0..2 {
            let report = build_report(&db, &config).await.unwrap();
            assert_eq!(report.electra_brand_id, 1);
            assert!(report.referenced_brand_delete.contains("Foreign key"));
        }
        db.close().await;

        let reopened = Database::new(config.db_config()).await.unwrap();
        let after = reopened.catalog().table_counts().await.unwrap();
        assert_eq!(after, before);
        assert_eq!(load_state(&after), LoadState::Loaded);
        reopened.close().await;
    }

    #[tokio::test]
    async fn test_unreferenced_brand_delete_is_rolled_back() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let loader = FixtureLoader::new(db.clone(), fixture_dir());
        loader.load_categories().await.unwrap();
        loader.load_brands().await.unwrap();

        let err = attempt_brand_delete(&db, 1).await.unwrap_err();
        assert!(err.to_string().contains("Brand 1 has no products"));
        assert_eq!(db.brands().count().await.unwrap(), 9);
    }
}
