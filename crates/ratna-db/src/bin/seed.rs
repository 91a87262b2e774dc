//! # Seed Data Generator
//!
//! Populates a database with a demo shop, today's metal rates and a small
//! jewelry catalog.
//!
//! ## Usage
//! ```bash
//! # Seed ./ratna_dev.db
//! cargo run -p ratna-db --bin seed
//!
//! # Specify database path and stock per item
//! cargo run -p ratna-db --bin seed -- --db ./data/ratna.db --stock 10
//! ```
//!
//! ## Generated Catalog
//! Every design is generated in each of its purities, e.g. `RNG-BND-22K`:
//! - Rings, bangles, chains and earrings in gold 22K / 18K
//! - Silver 925 pieces at a fixed per-gram rate
//! - Stone-set designs with rubies, emeralds or diamonds

use chrono::{Duration, Utc};
use ratna_core::{
    CatalogItem, ItemGemstone, ItemMaterial, MakingChargeType, Shop, DEFAULT_SHOP_ID,
};
use ratna_db::{Database, DbConfig};
use rust_decimal::Decimal;
use std::env;
use uuid::Uuid;

/// Per-gram rates in rupees: (metal, purity, rate).
const METAL_RATES: &[(&str, &str, i64)] = &[
    ("Gold", "24K", 7250),
    ("Gold", "22K", 6650),
    ("Gold", "18K", 5440),
    ("Silver", "925", 88),
    ("Platinum", "950", 3150),
];

/// A catalog design: (code, name, metal, purities, grams, making type, making rate).
type Design = (
    &'static str,
    &'static str,
    &'static str,
    &'static [&'static str],
    i64,
    MakingChargeType,
    i64,
);

const DESIGNS: &[Design] = &[
    ("RNG-BND", "Plain Band Ring", "Gold", &["22K", "18K"], 4, MakingChargeType::Percentage, 12),
    ("RNG-SOL", "Solitaire Ring", "Platinum", &["950"], 5, MakingChargeType::Fixed, 4500),
    ("BNG-KDA", "Kada Bangle", "Gold", &["22K"], 24, MakingChargeType::PerGram, 450),
    ("CHN-ROP", "Rope Chain", "Gold", &["22K", "18K"], 12, MakingChargeType::PerGram, 380),
    ("EAR-JHM", "Jhumka Earrings", "Gold", &["22K"], 9, MakingChargeType::Percentage, 14),
    ("ANK-PYL", "Payal Anklet", "Silver", &["925"], 38, MakingChargeType::PerGram, 35),
    ("PND-OM", "Om Pendant", "Silver", &["925"], 6, MakingChargeType::Fixed, 350),
];

/// Stones set into every third design: (name, carats as tenths, rupees per carat).
const STONES: &[(&str, i64, i64)] = &[
    ("Ruby", 5, 18000),
    ("Emerald", 8, 22000),
    ("Diamond", 3, 95000),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./ratna_dev.db");
    let mut stock: i64 = 5;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--stock" | "-s" => {
                if i + 1 < args.len() {
                    stock = args[i + 1].parse().unwrap_or(5);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Ratna Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>     Database file path (default: ./ratna_dev.db)");
                println!("  -s, --stock <N>     Pieces in stock per item (default: 5)");
                println!("  -h, --help          Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Ratna Seed Data Generator");
    println!("=========================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if db.shops().get_by_id(DEFAULT_SHOP_ID).await?.is_some() {
        println!("⚠ Demo shop already exists, skipping seed.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let now = Utc::now();
    db.shops()
        .insert(&Shop {
            id: DEFAULT_SHOP_ID.to_string(),
            name: "Ratna Demo Jewellers".to_string(),
            gst_gold_rate: Decimal::from(3),
            gst_making_rate: Decimal::from(5),
            state_code: "27".to_string(),
            created_at: now,
            updated_at: now,
        })
        .await?;
    println!("✓ Created shop {}", DEFAULT_SHOP_ID);

    // Backdated so the rates are already in force when pricing starts.
    let effective_at = now - Duration::hours(1);
    for (metal, purity, rate) in METAL_RATES {
        db.metal_rates()
            .set_rate(DEFAULT_SHOP_ID, metal, purity, Decimal::from(*rate), effective_at)
            .await?;
        println!("  {} {}: ₹{}/g", metal, purity, rate);
    }

    let mut generated = 0;
    for (index, design) in DESIGNS.iter().enumerate() {
        for purity in design.3 {
            let item = generate_item(design, purity, index, stock);
            if let Err(e) = db.items().insert(&item).await {
                eprintln!("Failed to insert {}: {}", item.sku, e);
                continue;
            }
            println!("  {} {}", item.sku, item.name);
            generated += 1;
        }
    }

    println!();
    println!("✓ Generated {} catalog items", generated);
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds one catalog item for a design in a given purity.
fn generate_item(design: &Design, purity: &str, index: usize, stock: i64) -> CatalogItem {
    let (code, name, metal, _, grams, making_type, making_rate) = *design;
    let now = Utc::now();

    let weight = Decimal::from(grams);
    let gemstones: Vec<ItemGemstone> = if index % 3 == 1 {
        let (stone, tenths, rate) = STONES[index % STONES.len()];
        vec![ItemGemstone {
            name: stone.to_string(),
            weight: Decimal::new(tenths, 1),
            rate_per_carat: Decimal::from(rate),
            gst_rate: None,
        }]
    } else {
        vec![]
    };

    // Stones add to the finished weight (1 ct = 0.2 g).
    let stone_grams: Decimal = gemstones
        .iter()
        .map(|g| g.weight * Decimal::new(2, 1))
        .sum();

    // Silver is sold at a fixed shop rate rather than the daily board rate.
    let rate_per_gram = (metal == "Silver").then(|| Decimal::from(95));

    CatalogItem {
        id: Uuid::new_v4().to_string(),
        shop_id: DEFAULT_SHOP_ID.to_string(),
        sku: format!("{}-{}", code, purity),
        name: format!("{} {} {}", name, metal, purity),
        gross_weight: weight + stone_grams,
        making_charge_type: making_type,
        making_charge_rate: Decimal::from(making_rate),
        wastage_percentage: if metal == "Gold" {
            Decimal::from(2)
        } else {
            Decimal::ZERO
        },
        materials: vec![ItemMaterial {
            metal: metal.to_string(),
            purity: purity.to_string(),
            weight,
            rate_per_gram,
            gst_rate: None,
        }],
        gemstones,
        stock_quantity: stock,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}
