//! Database seeder for YaraCheck development and testing.
//!
//! Seeds countries, their provinces and a super admin account. Safe to run
//! repeatedly: existing rows are left alone.
//!
//! Usage: cargo run --bin seeder
//!
//! Reads `DATABASE_URL`, and optionally `SEED_ADMIN_EMAIL` and
//! `SEED_ADMIN_PASSWORD`.

use std::sync::Arc;

use anyhow::Context;
use yaracheck_core::auth::{Role, hash_password};
use yaracheck_db::repositories::CreateProfileInput;
use yaracheck_db::{GeographyRepository, ProfileRepository};

const DEFAULT_ADMIN_EMAIL: &str = "admin@yaracheck.local";
const DEFAULT_ADMIN_PASSWORD: &str = "change-me-now";

/// (name, ISO code, provinces)
const COUNTRIES: &[(&str, &str, &[&str])] = &[
    ("Nigeria", "NG", &["Lagos", "Federal Capital Territory", "Kano", "Rivers", "Oyo"]),
    ("Ghana", "GH", &["Greater Accra", "Ashanti", "Northern"]),
    ("Kenya", "KE", &["Nairobi", "Mombasa", "Kisumu"]),
    ("South Africa", "ZA", &["Gauteng", "Western Cape", "KwaZulu-Natal"]),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = Arc::new(
        yaracheck_db::connect(&database_url, 2, 1)
            .await
            .context("Failed to connect to database")?,
    );

    println!("Seeding countries and provinces...");
    seed_geography(&GeographyRepository::new(db.clone())).await?;

    println!("Seeding super admin...");
    seed_super_admin(&ProfileRepository::new(db)).await?;

    println!("Seeding complete!");
    Ok(())
}

async fn seed_geography(repo: &GeographyRepository) -> anyhow::Result<()> {
    for (name, iso, provinces) in COUNTRIES {
        let country = match repo.find_country_by_iso(iso).await? {
            Some(existing) => {
                println!("  {name} already exists, skipping...");
                existing
            }
            None => repo.create_country(name, iso).await?,
        };

        let existing = repo.list_provinces(Some(country.id)).await?;
        for province in *provinces {
            if existing.iter().any(|p| p.name == *province) {
                continue;
            }
            repo.create_province(country.id, province).await?;
            println!("  + {province}, {name}");
        }
    }
    Ok(())
}

async fn seed_super_admin(repo: &ProfileRepository) -> anyhow::Result<()> {
    let email =
        std::env::var("SEED_ADMIN_EMAIL").unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_string());
    if repo.email_exists(&email).await? {
        println!("  {email} already exists, skipping...");
        return Ok(());
    }

    let password = std::env::var("SEED_ADMIN_PASSWORD")
        .unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string());
    let password_hash = hash_password(&password).context("Failed to hash admin password")?;

    let admin = repo
        .create(CreateProfileInput {
            email,
            password_hash,
            full_name: "YaraCheck Admin".to_string(),
            role: Role::SuperAdmin,
            admin_role: None,
            permissions: serde_json::Map::new(),
            country_id: None,
            province_id: None,
        })
        .await?;
    println!("  Created super admin {} ({})", admin.email, admin.id);
    Ok(())
}
