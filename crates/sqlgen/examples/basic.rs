//! Statement builder example for sqlgen
//!
//! Run with: cargo run --example basic -p sqlgen

use sqlgen::{Dialect, SqlError, StatementOptions, json};

fn main() -> Result<(), SqlError> {
    let mut dialect = Dialect::new();

    // ============================================
    // INSERT
    // ============================================
    println!("=== INSERT ===");

    let sql = dialect
        .insert()
        .into_table("products")
        .values(json!({
            "name": "Laptop",
            "price": 999,
            "in_stock": true
        }))
        .values(json!({
            "name": "Phone",
            "price": 599
        }))
        .to_sql()?;

    println!("{sql}");

    // ============================================
    // DELETE
    // ============================================
    println!("\n=== DELETE ===");

    let sql = dialect
        .delete()
        .from("products")
        .filter(json!({
            "in_stock": false,
            "price": { "<": 100 }
        }))
        .filter(json!({ "category": { "in": ["Outlet", "Clearance"] } }))
        .order_by("price DESC")?
        .limit(10)
        .to_sql()?;

    println!("{sql}");

    // ============================================
    // Value casting with a per-statement schema
    // ============================================
    println!("\n=== Casting ===");

    dialect.caster(|value, states| {
        if states.schema(states.name).as_deref() == Some("money") {
            value.as_i64().map(|cents| format!("{}.{:02}", cents / 100, cents % 100))
        } else {
            None
        }
    });

    let schema = |field: &str| (field == "price").then(|| "money".to_string());
    let sql = dialect
        .delete_with(StatementOptions::new().schema(schema))
        .from("products")
        .filter(json!({ "price": 12999 }))
        .to_sql()?;

    println!("{sql}");

    // ============================================
    // Common table expressions
    // ============================================
    println!("\n=== WITH ===");

    let archive = dialect
        .insert()
        .into_table("archived_products")
        .values(json!({ "name": "Tablet" }));
    let sql = dialect
        .delete()
        .with([("archived", archive)])?
        .from("products")
        .filter(json!({ "name": "Tablet" }))
        .to_sql()?;

    println!("{sql}");

    Ok(())
}
