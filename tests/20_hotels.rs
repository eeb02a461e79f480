mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use hotel_reservation::database::models::RoomSize;
use hotel_reservation::fixtures;

#[tokio::test]
async fn list_hotels_filters_by_rating_and_paginates() -> Result<()> {
    let server = common::spawn_server().await?;
    let james = fixtures::add_user(server.store(), "james", "foo", false, server.bcrypt_cost()).await?;
    let token = server.token_for(&james);

    for (name, rating) in [("A", 3), ("B", 5), ("C", 3), ("D", 3)] {
        fixtures::add_hotel(server.store(), name, "France", rating).await?;
    }

    let res = server.get("/api/v1/hotel?rating=3", Some(&token)).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["results"], 3);
    assert_eq!(body["page"], 1);
    let names: Vec<&str> = body["data"]
        .as_array()
        .map(|hotels| hotels.iter().filter_map(|h| h["name"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(names, vec!["A", "C", "D"]);

    let res = server.get("/api/v1/hotel?page=2&limit=3", Some(&token)).await?;
    let body: Value = res.json().await?;
    assert_eq!(body["page"], 2);
    assert_eq!(body["results"], 1);
    assert_eq!(body["data"][0]["name"], "D");
    Ok(())
}

#[tokio::test]
async fn list_hotels_rejects_bad_paging() -> Result<()> {
    let server = common::spawn_server().await?;
    let james = fixtures::add_user(server.store(), "james", "foo", false, server.bcrypt_cost()).await?;
    let token = server.token_for(&james);

    let res = server.get("/api/v1/hotel?page=0", Some(&token)).await?;
    common::expect_error(res, StatusCode::BAD_REQUEST).await?;

    let res = server.get("/api/v1/hotel?rating=high", Some(&token)).await?;
    common::expect_error(res, StatusCode::BAD_REQUEST).await?;
    Ok(())
}

#[tokio::test]
async fn huge_page_numbers_are_rejected_not_fatal() -> Result<()> {
    let server = common::spawn_server().await?;
    let james = fixtures::add_user(server.store(), "james", "foo", false, server.bcrypt_cost()).await?;
    let token = server.token_for(&james);

    let res = server.get(&format!("/api/v1/hotel?page={}", i64::MAX), Some(&token)).await?;
    let msg = common::expect_error(res, StatusCode::BAD_REQUEST).await?;
    assert_eq!(msg, "page out of range");

    let res = server
        .get(&format!("/api/v1/hotel?page={}&limit=10", i64::MAX / 5), Some(&token))
        .await?;
    common::expect_error(res, StatusCode::BAD_REQUEST).await?;

    // The server keeps answering afterwards
    let res = server.get("/api/v1/hotel", Some(&token)).await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn limit_is_capped_and_must_be_positive() -> Result<()> {
    let server = common::spawn_server_with(|config| {
        config.api.default_page_limit = 2;
        config.api.max_page_limit = 3;
    })
    .await?;
    let james = fixtures::add_user(server.store(), "james", "foo", false, server.bcrypt_cost()).await?;
    let token = server.token_for(&james);

    for name in ["A", "B", "C", "D", "E"] {
        fixtures::add_hotel(server.store(), name, "France", 4).await?;
    }

    let res = server.get("/api/v1/hotel", Some(&token)).await?;
    let body: Value = res.json().await?;
    assert_eq!(body["results"], 2);

    let res = server.get("/api/v1/hotel?limit=50", Some(&token)).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["results"], 3);

    let res = server.get("/api/v1/hotel?limit=0", Some(&token)).await?;
    common::expect_error(res, StatusCode::BAD_REQUEST).await?;
    Ok(())
}

#[tokio::test]
async fn get_hotel_and_its_rooms() -> Result<()> {
    let server = common::spawn_server().await?;
    let james = fixtures::add_user(server.store(), "james", "foo", false, server.bcrypt_cost()).await?;
    let token = server.token_for(&james);

    let hotel = fixtures::add_hotel(server.store(), "Bellucia", "France", 3).await?;
    let small = fixtures::add_room(server.store(), RoomSize::Small, true, 99.9, hotel.id).await?;
    let other = fixtures::add_hotel(server.store(), "Other", "Spain", 4).await?;
    fixtures::add_room(server.store(), RoomSize::Normal, false, 120.0, other.id).await?;

    let res = server.get(&format!("/api/v1/hotel/{}", hotel.id), Some(&token)).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["name"], "Bellucia");
    assert_eq!(body["rooms"], json!([small.id]));

    let res = server.get(&format!("/api/v1/hotel/{}/rooms", hotel.id), Some(&token)).await?;
    let rooms: Value = res.json().await?;
    assert_eq!(rooms.as_array().map(Vec::len), Some(1));
    assert_eq!(rooms[0]["id"], json!(small.id));
    assert_eq!(rooms[0]["size"], "small");

    let res = server.get("/api/v1/room", Some(&token)).await?;
    let rooms: Value = res.json().await?;
    assert_eq!(rooms.as_array().map(Vec::len), Some(2));
    Ok(())
}

#[tokio::test]
async fn unknown_or_malformed_hotel_id() -> Result<()> {
    let server = common::spawn_server().await?;
    let james = fixtures::add_user(server.store(), "james", "foo", false, server.bcrypt_cost()).await?;
    let token = server.token_for(&james);

    let res = server.get("/api/v1/hotel/not-a-uuid", Some(&token)).await?;
    let msg = common::expect_error(res, StatusCode::BAD_REQUEST).await?;
    assert_eq!(msg, "invalid id given");

    let missing = uuid::Uuid::new_v4();
    let res = server.get(&format!("/api/v1/hotel/{}", missing), Some(&token)).await?;
    common::expect_error(res, StatusCode::NOT_FOUND).await?;

    let res = server.get(&format!("/api/v1/hotel/{}/rooms", missing), Some(&token)).await?;
    common::expect_error(res, StatusCode::NOT_FOUND).await?;
    Ok(())
}

#[tokio::test]
async fn admin_creates_hotel_and_room() -> Result<()> {
    let server = common::spawn_server().await?;
    let admin = fixtures::add_user(server.store(), "admin", "admin", true, server.bcrypt_cost()).await?;
    let token = server.token_for(&admin);

    let res = server
        .post(
            "/api/v1/admin/hotel",
            Some(&token),
            &json!({ "name": "Harbor View", "location": "Portugal", "rating": 4 }),
        )
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let hotel: Value = res.json().await?;
    let hotel_id = hotel["id"].as_str().unwrap_or_default().to_string();
    assert_eq!(hotel["rooms"], json!([]));

    let res = server
        .post(
            &format!("/api/v1/admin/hotel/{}/room", hotel_id),
            Some(&token),
            &json!({ "size": "kingsize", "seaside": true, "price": 249.9 }),
        )
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let room: Value = res.json().await?;
    assert_eq!(room["hotel_id"], hotel_id.as_str());

    let res = server.get(&format!("/api/v1/hotel/{}", hotel_id), Some(&token)).await?;
    let hotel: Value = res.json().await?;
    assert_eq!(hotel["rooms"], json!([room["id"]]));
    Ok(())
}

#[tokio::test]
async fn admin_create_validates_input() -> Result<()> {
    let server = common::spawn_server().await?;
    let admin = fixtures::add_user(server.store(), "admin", "admin", true, server.bcrypt_cost()).await?;
    let token = server.token_for(&admin);

    let res = server
        .post("/api/v1/admin/hotel", Some(&token), &json!({ "name": "X", "location": "Y", "rating": 9 }))
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert!(body["errors"]["rating"].is_string());

    let missing = uuid::Uuid::new_v4();
    let res = server
        .post(
            &format!("/api/v1/admin/hotel/{}/room", missing),
            Some(&token),
            &json!({ "size": "small", "price": 50.0 }),
        )
        .await?;
    common::expect_error(res, StatusCode::NOT_FOUND).await?;
    Ok(())
}

#[tokio::test]
async fn non_admin_cannot_create_hotels() -> Result<()> {
    let server = common::spawn_server().await?;
    let james = fixtures::add_user(server.store(), "james", "foo", false, server.bcrypt_cost()).await?;
    let token = server.token_for(&james);

    let res = server
        .post("/api/v1/admin/hotel", Some(&token), &json!({ "name": "X", "location": "Y", "rating": 3 }))
        .await?;
    common::expect_error(res, StatusCode::UNAUTHORIZED).await?;

    let res = server.get("/api/v1/admin/user", Some(&token)).await?;
    common::expect_error(res, StatusCode::UNAUTHORIZED).await?;
    Ok(())
}
