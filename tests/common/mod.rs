#![allow(dead_code)]

use quotebook::{
    models::{quotes::NewQuote, users::NewUser},
    store::Store,
};
use tempfile::TempDir;

/// A migrated store backed by a fresh file. Keep the `TempDir` alive for as
/// long as the store is used.
pub async fn test_store() -> (Store, TempDir) {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let store = Store::from_path(dir.path().join("quotebook.db"));
    store.migrate().await.expect("migrations should apply");

    (store, dir)
}

pub fn new_user(username: &str, email: &str, age: Option<i64>) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: email.to_string(),
        age,
    }
}

pub fn new_quote(text: &str, author: &str, category: Option<&str>) -> NewQuote {
    NewQuote {
        text: text.to_string(),
        author: author.to_string(),
        source: None,
        category: category.map(str::to_string),
    }
}
