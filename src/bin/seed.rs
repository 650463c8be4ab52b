//! Seed the catalog with the demo products.
//!
//! The seller id is taken from `SELLER_ID` when set, so seeded listings can
//! belong to a real account; otherwise a fresh id is generated.

use std::env;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use dotenvy::dotenv;
use uuid::Uuid;

use marketplace_service::domain::catalog::NewListing;
use marketplace_service::domain::ports::ProductCatalog;
use marketplace_service::infrastructure::product_repo::DieselProductCatalog;
use marketplace_service::{create_pool, run_migrations};

fn listing(seller_id: Uuid, title: &str, description: &str, price: &str, image_url: &str) -> NewListing {
    NewListing {
        title: title.to_string(),
        description: description.to_string(),
        price: BigDecimal::from_str(price).expect("valid seed price"),
        image_url: image_url.to_string(),
        seller_id,
    }
}

fn sample_listings(seller_id: Uuid) -> Vec<NewListing> {
    vec![
        listing(
            seller_id,
            "Vintage Leather Jacket",
            "Classic brown leather jacket in excellent condition. Size M.",
            "89.99",
            "https://images.unsplash.com/photo-1551028719-00167b16eac5?auto=format&fit=crop&q=80",
        ),
        listing(
            seller_id,
            "MacBook Pro 2019",
            "13-inch, 8GB RAM, 256GB SSD. Minor scratches but works perfectly.",
            "799.99",
            "https://images.unsplash.com/photo-1517336714731-489689fd1ca8?auto=format&fit=crop&q=80",
        ),
        listing(
            seller_id,
            "Acoustic Guitar",
            "Yamaha FG800 with case. Great for beginners.",
            "150.00",
            "https://images.unsplash.com/photo-1510915361894-db8b60106cb1?auto=format&fit=crop&q=80",
        ),
        listing(
            seller_id,
            "Canon DSLR Camera",
            "Canon EOS 700D with 18-55mm lens. Includes memory card and bag.",
            "349.99",
            "https://images.unsplash.com/photo-1502920917128-1aa500764cbd?auto=format&fit=crop&q=80",
        ),
        listing(
            seller_id,
            "Vintage Record Player",
            "1970s turntable in working condition. Perfect for vinyl enthusiasts.",
            "199.99",
            "https://images.unsplash.com/photo-1461360228754-6e81c478b882?auto=format&fit=crop&q=80",
        ),
        listing(
            seller_id,
            "Mountain Bike",
            "Trek Marlin 5, excellent condition, recently serviced.",
            "450.00",
            "https://images.unsplash.com/photo-1576435728678-68d0fbf94e91?auto=format&fit=crop&q=80",
        ),
        listing(
            seller_id,
            "Designer Sunglasses",
            "Ray-Ban Wayfarer, barely used, includes case.",
            "95.00",
            "https://images.unsplash.com/photo-1572635196237-14b3f281503f?auto=format&fit=crop&q=80",
        ),
        listing(
            seller_id,
            "Antique Watch",
            "1960s Omega Seamaster, recently serviced, keeps perfect time.",
            "1200.00",
            "https://images.unsplash.com/photo-1524592094714-0f0654e20314?auto=format&fit=crop&q=80",
        ),
    ]
}

fn main() {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let seller_id = match env::var("SELLER_ID") {
        Ok(raw) => Uuid::parse_str(&raw).expect("SELLER_ID must be a valid UUID"),
        Err(_) => Uuid::new_v4(),
    };

    let pool = create_pool(&database_url);
    run_migrations(&pool);

    let catalog = DieselProductCatalog::new(pool);
    for entry in sample_listings(seller_id) {
        let title = entry.title.clone();
        match catalog.create(entry) {
            Ok(id) => log::info!("Seeded '{}' as {}", title, id),
            Err(e) => log::error!("Could not seed '{}': {}", title, e),
        }
    }
}
