//! # Seed Data Generator
//!
//! Populates the database with sweets and a demo purchaser for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p sweetshop-db --bin seed
//!
//! # Specify database path
//! cargo run -p sweetshop-db --bin seed -- --db ./data/sweetshop.db
//! ```

use chrono::Utc;
use std::env;
use sweetshop_core::{NewSweet, User};
use sweetshop_db::{Database, DbConfig};
use uuid::Uuid;

/// Sweets per category for realistic test data: (name, price_cents, stock).
const CATALOG: &[(&str, &[(&str, i64, i64)])] = &[
    (
        "chocolate",
        &[
            ("Dark Chocolate Bar", 1299, 40),
            ("Milk Chocolate Bar", 1099, 60),
            ("Chocolate Truffles", 1899, 25),
            ("Sea-Salt Caramel Fudge", 1599, 50),
            ("Hazelnut Pralines", 2199, 15),
            ("White Chocolate Buttons", 899, 70),
        ],
    ),
    (
        "gummies",
        &[
            ("Gummy Bears", 499, 120),
            ("Sour Worms", 549, 90),
            ("Cola Bottles", 449, 100),
            ("Peach Rings", 599, 80),
            ("Fizzy Strawberries", 649, 60),
        ],
    ),
    (
        "hard candy",
        &[
            ("Lemon Drops", 399, 150),
            ("Butterscotch Discs", 449, 110),
            ("Peppermint Twists", 349, 130),
            ("Rhubarb & Custard", 529, 75),
        ],
    ),
    (
        "marshmallow",
        &[
            ("Vanilla Marshmallows", 699, 55),
            ("Toasted Coconut Mallows", 799, 35),
            ("Strawberry Clouds", 749, 45),
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./sweetshop_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Sweet Shop Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./sweetshop_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Sweet Shop Seed Data Generator");
    println!("==============================");
    println!("Database: {db_path}");
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.sweets().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {existing} sweets");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Demo purchaser so purchase flows can be exercised immediately.
    let demo_user = User {
        id: Uuid::new_v4().to_string(),
        email: "demo@sweetshop.example".to_string(),
        name: "Demo Purchaser".to_string(),
        created_at: Utc::now(),
    };
    db.users().insert(&demo_user).await?;
    println!("✓ Demo purchaser: {}", demo_user.id);

    println!();
    println!("Generating sweets...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    for (category, sweets) in CATALOG {
        for (name, price_cents, quantity) in *sweets {
            let result = db
                .catalog()
                .create(NewSweet {
                    name: name.to_string(),
                    category: category.to_string(),
                    price_cents: *price_cents,
                    quantity: *quantity,
                    description: None,
                })
                .await;

            if let Err(e) = result {
                eprintln!("Failed to insert {name}: {e}");
                continue;
            }

            generated += 1;
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {generated} sweets in {elapsed:?}");

    // Verify search
    let results = db.catalog().search(&Default::default()).await?;
    println!("  Catalog now lists {} sweets", results.len());

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}
