use anyhow::Context;
use chrono::{Duration, Utc};
use clap::Parser;
use serde_json::json;

use hotel_reservation::auth::TokenService;
use hotel_reservation::config::AppConfig;
use hotel_reservation::database::models::RoomSize;
use hotel_reservation::database::Store;
use hotel_reservation::fixtures;

#[derive(Parser)]
#[command(name = "seed")]
#[command(about = "Reset the store and load fixture users, hotels, rooms and bookings")]
#[command(version)]
struct Cli {
    #[arg(long, help = "Number of generated hotels to add", default_value = "100")]
    hotels: usize,

    #[arg(long, help = "Output in JSON format")]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let cost = config.security.bcrypt_cost;
    let tokens = TokenService::from_config(&config.security)?;

    let store = Store::connect(&config.database).await?;
    store.clear().await?;
    tracing::info!("Cleared all collections");

    let james = fixtures::add_user(&store, "james", "foo", false, cost).await?;
    let admin = fixtures::add_user(&store, "admin", "admin", true, cost).await?;

    let hotel = fixtures::add_hotel(&store, "some hotel", "bermuda", 5).await?;
    let room = fixtures::add_room(&store, RoomSize::Kingsize, true, 88.44, hotel.id).await?;

    let from = Utc::now() + Duration::days(1);
    let booking = fixtures::add_booking(&store, james.id, room.id, from, from + Duration::days(5)).await?;

    let generated = fixtures::add_random_hotels(&store, cli.hotels).await?;

    let james_token = tokens.mint(&james)?;
    let admin_token = tokens.mint(&admin)?;

    if cli.json {
        let summary = json!({
            "users": {
                "james": { "id": james.id, "email": james.email, "token": james_token },
                "admin": { "id": admin.id, "email": admin.email, "token": admin_token },
            },
            "hotel": hotel.id,
            "room": room.id,
            "booking": booking.id,
            "generated_hotels": generated.len(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("✓ james {} -> {}", james.email, james_token);
        println!("✓ admin {} -> {}", admin.email, admin_token);
        println!("✓ hotel {} with room {}", hotel.id, room.id);
        println!("✓ booking {}", booking.id);
        println!("✓ {} generated hotels", generated.len());
    }

    store.close().await;
    Ok(())
}
