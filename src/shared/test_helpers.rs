use axum_test::TestServer;
use fake::faker::address::en::{CityName, CountryName, StateName};
use fake::faker::lorem::en::Word;
use fake::Fake;
use serde_json::{json, Value};

use crate::features::{router, Repositories};
use crate::modules::storage::Document;

fn coordinates() -> (String, String) {
    let latitude: f64 = (-89.0..89.0).fake();
    let longitude: f64 = (-179.0..179.0).fake();
    (format!("{:.5}", latitude), format!("{:.5}", longitude))
}

fn document(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture must be an object, got {}", other),
    }
}

/// Country draft without `countryId`
pub fn country_draft() -> Document {
    let (latitude, longitude) = coordinates();
    document(json!({
        "name": CountryName().fake::<String>(),
        "iso2": "PE",
        "iso3": "PER",
        "phone_code": "51",
        "capital": CityName().fake::<String>(),
        "currency": "PEN",
        "latitude": latitude,
        "longitude": longitude,
    }))
}

/// State draft without `stateId`
pub fn state_draft(country_id: i64) -> Document {
    let (latitude, longitude) = coordinates();
    document(json!({
        "name": StateName().fake::<String>(),
        "stateCode": Word().fake::<String>().to_uppercase(),
        "countryId": country_id,
        "latitude": latitude,
        "longitude": longitude,
    }))
}

/// City draft without `cityId`
pub fn city_draft(country_id: i64, state_id: i64) -> Document {
    let (latitude, longitude) = coordinates();
    document(json!({
        "name": CityName().fake::<String>(),
        "countryId": country_id,
        "stateId": state_id,
        "latitude": latitude,
        "longitude": longitude,
    }))
}

/// Test server over empty in-memory repositories
pub fn test_server() -> TestServer {
    test_server_with(Repositories::in_memory())
}

pub fn test_server_with(repos: Repositories) -> TestServer {
    TestServer::new(router(repos)).unwrap()
}
