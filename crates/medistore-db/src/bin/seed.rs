//! # Seed Data Generator
//!
//! Populates the database with a pharmacy catalogue and a few weeks of
//! sales, for trying the reports locally.
//!
//! ## Usage
//! ```bash
//! # 8 weeks of sales (default)
//! cargo run -p medistore-db --bin seed
//!
//! # Custom history length
//! cargo run -p medistore-db --bin seed -- --weeks 12
//!
//! # Specify database path
//! cargo run -p medistore-db --bin seed -- --db ./data/medistore.db
//! ```
//!
//! Sales are spread over every day of the window with a deterministic
//! pattern, so two runs against empty databases produce the same totals.

use chrono::{NaiveTime, TimeDelta, Utc};
use std::env;
use medistore_core::Money;
use medistore_db::{Database, DbConfig, NewSale, SalesRepository};

/// Catalogue: (name, unit price in paisa).
const MEDICINES: &[(&str, i64)] = &[
    ("Panadol 500mg", 4_50),
    ("Brufen 400mg", 12_00),
    ("Augmentin 625mg", 68_75),
    ("Flagyl 400mg", 9_80),
    ("Disprin 300mg", 2_25),
    ("Arinac Forte", 15_40),
    ("Risek 20mg", 22_10),
    ("Ponstan 500mg", 6_30),
    ("Calpol Syrup 120ml", 95_00),
    ("Gaviscon Liquid 120ml", 180_00),
    ("Softin 10mg", 11_60),
    ("Surbex Z", 14_90),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut weeks: i64 = 8;
    let mut db_path = String::from("./medistore_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--weeks" | "-w" => {
                if i + 1 < args.len() {
                    weeks = args[i + 1].parse().unwrap_or(8);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("MediStore Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -w, --weeks <N>    Weeks of sales history to generate (default: 8)");
                println!("  -d, --db <PATH>    Database file path (default: ./medistore_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("MediStore Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!("Weeks:    {}", weeks);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut catalogue = Vec::with_capacity(MEDICINES.len());
    for (name, price) in MEDICINES {
        let id = db.products().insert(name, Money::from_cents(*price)).await?;
        catalogue.push((id, Money::from_cents(*price)));
    }
    println!("✓ Inserted {} products", catalogue.len());

    let start = std::time::Instant::now();
    let today = Utc::now().date_naive();
    let sales = db.sales();
    let mut generated = 0usize;

    for day_offset in 0..(weeks * 7) {
        let Some(day) = today.checked_sub_signed(TimeDelta::days(day_offset)) else {
            break;
        };

        // 3 to 9 sales a day
        let per_day = 3 + (day_offset * 5 % 7) as usize;
        for n in 0..per_day {
            let seed = day_offset as usize * 31 + n * 7;
            let (product_id, price) = &catalogue[seed % catalogue.len()];
            let quantity = 1 + (seed % 4) as i64;

            let minutes = 9 * 60 + (seed * 37 % (12 * 60)) as u32;
            let time = NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).unwrap_or(NaiveTime::MIN);
            let created_at = day.and_time(time).and_utc();

            let sale = NewSale::new(product_id, quantity, *price, day).created_at(created_at);
            if let Err(e) = sales.insert_sale(&sale).await {
                eprintln!("Failed to insert sale for {}: {}", day, e);
                continue;
            }
            generated += 1;
        }
    }

    println!("✓ Generated {} sales in {:?}", generated, start.elapsed());

    let report = db.reports().weekly_report(today).await?;
    println!();
    println!("Weekly report: {} rows over {} weeks", report.rows.len(), report.weeks.len());
    println!("  Revenue: {}", report.totals.total_revenue);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
