//! # Seed Data Generator
//!
//! Populates a demo tenant with a profile, raw materials and products.
//!
//! ## Usage
//! ```bash
//! # Seed the default tenant into ./bakehouse.db
//! cargo run -p bakehouse-db --bin seed
//!
//! # Specify tenant and database path
//! cargo run -p bakehouse-db --bin seed -- --tenant my-bakery --db ./data/bakehouse.db
//! ```
//!
//! ## Generated Data
//! - Profile: "Sweet Crumbs Bakery" issuer block
//! - Inventory: flour, sugar, butter, eggs, milk, cocoa, vanilla, baking powder
//! - Products: recipes over that inventory, costed from it

use chrono::Utc;
use std::env;

use bakehouse_core::recipe::{build_product, ProductDraft, RecipeLine};
use bakehouse_core::{InventoryItem, Money, ProfileUpdate, TenantProfile, Unit};
use bakehouse_db::{Database, DbConfig};

/// (name, quantity, unit, total cost in paise)
const INVENTORY: &[(&str, f64, Unit, i64)] = &[
    ("All-purpose flour", 5000.0, Unit::Grams, 22500),
    ("Caster sugar", 2000.0, Unit::Grams, 10000),
    ("Unsalted butter", 1000.0, Unit::Grams, 56000),
    ("Eggs", 30.0, Unit::Pieces, 21000),
    ("Whole milk", 2.0, Unit::Liters, 13200),
    ("Cocoa powder", 250.0, Unit::Grams, 10000),
    ("Vanilla extract", 10.0, Unit::Teaspoons, 5000),
    ("Baking powder", 40.0, Unit::Tablespoons, 4000),
];

/// (name, weight in grams, [(inventory name, quantity)])
const PRODUCTS: &[(&str, f64, &[(&str, f64)])] = &[
    (
        "Chocolate Cake",
        1000.0,
        &[
            ("All-purpose flour", 250.0),
            ("Caster sugar", 200.0),
            ("Unsalted butter", 150.0),
            ("Eggs", 4.0),
            ("Cocoa powder", 60.0),
            ("Baking powder", 1.0),
        ],
    ),
    (
        "Vanilla Sponge",
        800.0,
        &[
            ("All-purpose flour", 200.0),
            ("Caster sugar", 180.0),
            ("Unsalted butter", 120.0),
            ("Eggs", 3.0),
            ("Vanilla extract", 2.0),
        ],
    ),
    (
        "Butter Cookies (dozen)",
        300.0,
        &[
            ("All-purpose flour", 150.0),
            ("Caster sugar", 60.0),
            ("Unsalted butter", 100.0),
            ("Vanilla extract", 1.0),
        ],
    ),
    (
        "Milk Bread",
        500.0,
        &[
            ("All-purpose flour", 300.0),
            ("Whole milk", 0.2),
            ("Caster sugar", 30.0),
            ("Unsalted butter", 30.0),
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut tenant_id = String::from("demo-bakery");
    let mut db_path = String::from("./bakehouse.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--tenant" | "-t" => {
                if i + 1 < args.len() {
                    tenant_id = args[i + 1].clone();
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
                println!("Bakehouse Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -t, --tenant <ID>  Tenant to seed (default: demo-bakery)");
                println!("  -d, --db <PATH>    Database file path (default: ./bakehouse.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Bakehouse Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!("Tenant:   {}", tenant_id);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.inventory().list(&tenant_id).await?;
    if !existing.is_empty() {
        println!("⚠ Tenant already has {} inventory items", existing.len());
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    let now = Utc::now();

    // Profile
    let mut profile = TenantProfile::empty(&tenant_id);
    profile.apply(
        ProfileUpdate {
            name: Some("Asha Menon".to_string()),
            bakery_name: Some("Sweet Crumbs Bakery".to_string()),
            bakery_address: Some("12 MG Road, Kochi".to_string()),
            bakery_phone: Some("+91 98470 12345".to_string()),
            bakery_email: Some("hello@sweetcrumbs.example".to_string()),
        },
        now,
    );
    db.profiles().upsert(&profile).await?;
    println!("✓ Profile: {}", profile.bakery_name);

    // Inventory
    let mut inventory = Vec::with_capacity(INVENTORY.len());
    for (name, quantity, unit, cost) in INVENTORY {
        let item = InventoryItem::new(&tenant_id, *name, *quantity, *unit, Money::from_cents(*cost), now);
        db.inventory().insert(&item).await?;
        println!("  + {:<20} {:>8} {:<5} {}", item.name, item.total_quantity, item.unit, item.total_cost());
        inventory.push(item);
    }
    println!("✓ Inventory: {} items", inventory.len());

    // Products
    for (name, weight, recipe) in PRODUCTS {
        let mut lines = Vec::with_capacity(recipe.len());
        for (ingredient, quantity) in recipe.iter() {
            let item = inventory
                .iter()
                .find(|item| item.name == *ingredient)
                .ok_or_else(|| format!("seed recipe references unknown ingredient {ingredient}"))?;
            lines.push(RecipeLine {
                ingredient_id: item.id.clone(),
                quantity: *quantity,
            });
        }

        let draft = ProductDraft {
            name: name.to_string(),
            weight_grams: *weight,
            ingredients: lines,
        };
        let product = build_product(&tenant_id, &draft, &inventory, now)?;
        db.products().insert(&product).await?;
        println!("  + {:<24} cost {}", product.name, product.total_cost());
    }
    println!("✓ Products: {}", PRODUCTS.len());

    println!();
    println!("Done.");

    Ok(())
}
