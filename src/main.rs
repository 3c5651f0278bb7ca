use dotenvy::dotenv;
use rent_ledger::{
    config::{database, settings},
    core::{receipt::format_currency, report, room},
    errors::Result,
    office::BackOffice,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load config.toml, falling back to defaults when it is missing
    let settings = settings::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // 4. Connect and make sure every table exists
    let url = database::get_database_url();
    if url.starts_with("sqlite://data/") {
        std::fs::create_dir_all("data")?;
    }
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to the entity store: {}", e))?;
    database::create_tables(&db).await?;

    // 5. Seed configured rooms that are not in the store yet
    room::seed_rooms(&db, &settings.rooms).await?;

    // 6. Load the back office and report
    let office = BackOffice::load(db, settings).await?;
    let today = chrono::Local::now().date_naive();
    let stats = office.dashboard(today);
    let symbol = &office.settings().receipt.currency_symbol;
    let money = |amount: f64| format_currency(amount, symbol);

    info!(
        occupancy_rate = stats.occupancy_rate,
        collection_rate = stats.collection_rate,
        overdue_bills = stats.overdue_bills,
        "Dashboard computed"
    );

    println!("{}", office.settings().receipt.business_name);
    println!(
        "Rooms: {} total, {} occupied, {} vacant, {} maintenance ({}% occupied)",
        stats.total_rooms,
        stats.occupied_rooms,
        stats.vacant_rooms,
        stats.maintenance_rooms,
        stats.occupancy_rate
    );
    println!(
        "Tenants: {} total, {} active",
        stats.total_tenants, stats.active_tenants
    );
    println!(
        "This month: collected {}, expenses {}, net {}",
        money(stats.monthly_collection),
        money(stats.monthly_expenses),
        money(stats.net_income)
    );
    println!(
        "Outstanding: {} across {} overdue bill(s), collection rate {}%",
        money(stats.outstanding_amount),
        stats.overdue_bills,
        stats.collection_rate
    );
    for month in office.vacancy_forecast(today) {
        println!(
            "{}: {} room(s) available, {} departure(s)",
            month.period.label(),
            month.available,
            month.departing_tenants.len()
        );
    }
    for row in report::aging_report(office.snapshot(), today) {
        if row.bills > 0 {
            println!("{}: {} bill(s), {}", row.bucket.label(), row.bills, money(row.amount));
        }
    }

    Ok(())
}
