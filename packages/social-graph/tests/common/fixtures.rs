//! Test fixtures for creating test data.

use chrono::{Datelike, Utc};
use serde_json::{json, Value};
use social_graph_core::domains::social_graph::models::User;

pub fn user(username: &str) -> User {
    User::minimal(username)
}

pub fn private_user(username: &str) -> User {
    User::minimal(username).with_privacy(true)
}

/// A user of the given age this year.
pub fn person(username: &str, town: &str, gender: &str, age: i32) -> User {
    User {
        username: username.to_string(),
        town: town.to_string(),
        gender: gender.to_string(),
        year_of_birth: Utc::now().year() - age,
        is_private: false,
    }
}

/// Coordinator-shaped user payload.
pub fn saga_user(username: &str, private: bool) -> Value {
    json!({
        "Username": username,
        "Email": format!("{}@example.com", username),
        "FirstName": "Test",
        "LastName": "User",
        "Town": "Novi Sad",
        "Gender": "F",
        "Website": "",
        "CompanyName": "",
        "Private": private,
        "Role": "Regular"
    })
}

pub fn saga_command(kind: i8, user: Value) -> Vec<u8> {
    serde_json::to_vec(&json!({ "Command": kind, "User": user })).expect("serializable")
}

pub fn usernames(users: &[User]) -> Vec<String> {
    users.iter().map(|u| u.username.clone()).collect()
}

pub fn json_usernames(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|users| {
            users
                .iter()
                .filter_map(|u| u["username"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
