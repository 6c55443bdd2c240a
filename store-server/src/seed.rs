//! Demo catalogue bootstrap
//!
//! Seeds the electronics catalogue and a demo customer on first start.
//! Idempotent: runs only against an empty product table.

use crate::catalog::CatalogService;
use crate::store::{StorageResult, Store};
use shared::models::{Address, Customer, Product};

/// Seed demo data when the catalogue is empty. Returns true when seeding
/// actually ran.
pub fn seed_demo_data(catalog: &CatalogService, store: &Store) -> StorageResult<bool> {
    if !catalog.is_empty() {
        return Ok(false);
    }

    for product in demo_products() {
        catalog.save_product(product)?;
    }

    let mut customer = Customer::new("C001", "john_doe", "John Doe", "john.doe@email.com");
    customer.add_address(Address::new("123 Main St", "Melbourne", "3000", "Australia"));
    store.put_customer(&customer)?;

    tracing::info!(
        products = catalog.all_products().len(),
        categories = catalog.categories().len(),
        "demo catalogue seeded"
    );
    Ok(true)
}

fn demo_products() -> Vec<Product> {
    vec![
        // --- Smartphones ---
        Product::new(
            "P001",
            "iPhone 17 Pro",
            "Apple's latest flagship with A19 chip and upgraded camera system",
            "Smartphones",
            1899.00,
            40,
        ),
        Product::new(
            "P002",
            "Samsung Galaxy S25 Ultra",
            "Top-tier Android with 200MP camera and S Pen support",
            "Smartphones",
            1999.00,
            35,
        ),
        Product::new(
            "P009",
            "Samsung Galaxy S25+",
            "Bigger 6.7\" model with enhanced battery life and upgraded camera",
            "Smartphones",
            1699.00,
            40,
        ),
        Product::new(
            "P010",
            "iPhone 17 Pro Max",
            "Apple's top-tier model with A19 Pro chip and advanced zoom system",
            "Smartphones",
            2199.00,
            30,
        ),
        Product::new(
            "P011",
            "Google Pixel 9 Pro",
            "Google flagship with Tensor G4 chip and industry-leading AI camera",
            "Smartphones",
            1699.00,
            28,
        ),
        Product::new(
            "P012",
            "Google Pixel Fold 2",
            "Second-gen foldable with stronger hinge and brighter display",
            "Smartphones",
            2499.00,
            15,
        ),
        Product::new(
            "P013",
            "Samsung Galaxy Z Fold 6",
            "Newest foldable with slimmer design and Snapdragon 8 Elite",
            "Smartphones",
            2799.00,
            20,
        ),
        Product::new(
            "P014",
            "Samsung Galaxy Z Flip 6",
            "Compact foldable with improved durability and better battery",
            "Smartphones",
            1599.00,
            25,
        ),
        // --- Laptops ---
        Product::new(
            "P003",
            "MacBook Pro 2024 (M3 Pro)",
            "High-performance laptop with M3 Pro chip",
            "Laptops",
            3299.00,
            20,
        ),
        Product::new(
            "P007",
            "Dell XPS 14 (2024)",
            "Premium 14-inch laptop with Intel Ultra processors",
            "Laptops",
            2499.00,
            18,
        ),
        Product::new(
            "P015",
            "MacBook Air 2024 (M3)",
            "Ultra-portable laptop with M3 chip and longer battery life",
            "Laptops",
            1899.00,
            22,
        ),
        Product::new(
            "P016",
            "Razer Blade 16 (2024)",
            "High-end gaming laptop with RTX 4090 and 240Hz display",
            "Laptops",
            5399.00,
            10,
        ),
        // --- Tablets ---
        Product::new(
            "P005",
            "iPad Pro 2024 (M4)",
            "Ultra-powerful tablet with OLED display and M4 chip",
            "Tablets",
            1699.00,
            25,
        ),
        // --- Headphones / Audio ---
        Product::new(
            "P004",
            "Sony WH-1000XM6",
            "Next-gen ANC wireless headphones with improved sound",
            "Headphones",
            549.00,
            50,
        ),
        Product::new(
            "P008",
            "Bose QuietComfort Ultra",
            "Flagship ANC headphones with immersive audio",
            "Headphones",
            499.00,
            30,
        ),
        // --- Wearables ---
        Product::new(
            "P006",
            "Apple Watch Series 10",
            "Latest smartwatch with redesigned thin body and advanced health sensors",
            "Wearables",
            799.00,
            45,
        ),
        Product::new(
            "P018",
            "Apple Vision Pro 2 (2025)",
            "Next-gen spatial computing headset with lighter design",
            "Wearables",
            5899.00,
            8,
        ),
    ]
}
