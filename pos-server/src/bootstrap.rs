//! Startup data
//!
//! - [`ensure_admin`] creates the configured admin account once
//! - [`seed_demo_data`] fills an empty store with a small menu, tables and
//!   couriers

use anyhow::Context;
use rust_decimal::Decimal;
use shared::models::{
    CategoryCreate, Courier, DiningTableCreate, Product, UserAccount, UserRole,
};
use shared::util::{new_id, now_millis};

use crate::auth::hash_password;
use crate::core::ServerState;

/// Create an approved admin when a password is configured and the username
/// is free. Returns whether an account was created.
pub async fn ensure_admin(state: &ServerState) -> anyhow::Result<bool> {
    let Some(password) = state.config.admin_password.as_deref() else {
        tracing::debug!("ADMIN_PASSWORD not set, skipping admin bootstrap");
        return Ok(false);
    };
    let username = state.config.admin_username.as_str();

    let users = state.users();
    if users.find_by_username(username).await?.is_some() {
        tracing::debug!(username, "Admin account already exists");
        return Ok(false);
    }

    let password_hash = hash_password(password)
        .map_err(|e| anyhow::anyhow!("failed to hash admin password: {}", e))?;
    let account = UserAccount {
        id: new_id(),
        username: username.to_string(),
        password_hash,
        role: UserRole::Admin,
        is_approved: true,
        courier_id: None,
        created_at: now_millis(),
    };
    users
        .insert(&account)
        .await
        .context("failed to create admin account")?;

    tracing::info!(username, "Admin account created");
    Ok(true)
}

/// Demo menu: (category, [(product, price in cents)])
const DEMO_MENU: &[(&str, &[(&str, i64)])] = &[
    (
        "Pizza",
        &[("Margherita", 850), ("Quattro Formaggi", 1150), ("Diavola", 1050)],
    ),
    ("Salads", &[("Caesar Salad", 920), ("Greek Salad", 780)]),
    (
        "Drinks",
        &[("Lemonade", 350), ("Espresso", 220), ("Sparkling Water", 250)],
    ),
];

const DEMO_TABLES: &[(u32, u32)] = &[(1, 2), (2, 2), (3, 4), (4, 4), (5, 6), (6, 8)];

const DEMO_COURIERS: &[(&str, &str, &str, &str)] = &[
    ("Marko", "Petrovic", "+381601234567", "scooter"),
    ("Ana", "Jovanovic", "+381607654321", "bicycle"),
];

/// Seed demo data into an empty store. Returns whether anything was written.
pub async fn seed_demo_data(state: &ServerState) -> anyhow::Result<bool> {
    let has_categories = !state.categories().find_all(false).await?.is_empty();
    let has_tables = !state.tables().find_all().await?.is_empty();
    if has_categories || has_tables {
        tracing::debug!("Store not empty, skipping demo seed");
        return Ok(false);
    }

    let now = now_millis();
    let products = state.products();
    for (category_name, items) in DEMO_MENU {
        let category = state
            .categories()
            .create(CategoryCreate {
                name: category_name.to_string(),
                description: None,
            })
            .await
            .with_context(|| format!("failed to seed category {}", category_name))?;

        for (name, cents) in items.iter() {
            products
                .insert(&Product {
                    id: new_id(),
                    name: name.to_string(),
                    description: None,
                    price: Decimal::new(*cents, 2),
                    category_id: category.id.clone(),
                    is_available: true,
                    image_url: None,
                    created_at: now,
                })
                .await
                .with_context(|| format!("failed to seed product {}", name))?;
        }
    }

    for (number, capacity) in DEMO_TABLES {
        state
            .tables()
            .create(DiningTableCreate {
                number: *number,
                capacity: *capacity,
            })
            .await
            .with_context(|| format!("failed to seed table {}", number))?;
    }

    for (first_name, last_name, phone, vehicle) in DEMO_COURIERS {
        state
            .couriers()
            .insert(&Courier {
                id: new_id(),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                phone_number: phone.to_string(),
                vehicle_type: Some(vehicle.to_string()),
                vehicle_plate: None,
                is_available: true,
                is_approved: true,
                user_id: None,
                created_at: now,
            })
            .await
            .context("failed to seed courier")?;
    }

    tracing::info!(
        categories = DEMO_MENU.len(),
        tables = DEMO_TABLES.len(),
        couriers = DEMO_COURIERS.len(),
        "Demo data seeded"
    );
    Ok(true)
}
