//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::borrow::Cow;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use crate::core::dataset::Item;
use crate::core::pagination::{FetchError, PageSource, VecPageSource};
use crate::core::search::{SearchOptions, Searchable};
use crate::core::state::App;

/// A page source that replays canned responses and records which pages
/// were asked for. Once the script runs out every page is empty.
pub struct ScriptedSource<T> {
    inner: Arc<Mutex<Script<T>>>,
}

struct Script<T> {
    responses: VecDeque<Result<Vec<T>, FetchError>>,
    requested: Vec<u32>,
}

impl<T> Clone for ScriptedSource<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> ScriptedSource<T> {
    pub fn new(responses: Vec<Result<Vec<T>, FetchError>>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Script {
                responses: responses.into(),
                requested: Vec::new(),
            })),
        }
    }

    pub fn requested_pages(&self) -> Vec<u32> {
        self.inner.lock().unwrap().requested.clone()
    }
}

#[async_trait]
impl<T: Send + 'static> PageSource<T> for ScriptedSource<T> {
    async fn fetch_page(&self, page: u32) -> Result<Vec<T>, FetchError> {
        let mut script = self.inner.lock().unwrap();
        script.requested.push(page);
        script.responses.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Small searchable record with an optional title and origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Fruit {
    pub id: u32,
    pub title: Option<String>,
    pub origin: Option<String>,
}

impl Fruit {
    pub fn new(id: u32, title: &str) -> Self {
        Self {
            id,
            title: Some(title.to_string()),
            origin: None,
        }
    }

    fn grown_in(id: u32, title: &str, origin: &str) -> Self {
        Self {
            origin: Some(origin.to_string()),
            ..Self::new(id, title)
        }
    }
}

impl Searchable for Fruit {
    fn field_text(&self, field: &str) -> Option<Cow<'_, str>> {
        let value = match field {
            "title" => self.title.as_deref(),
            "origin" => self.origin.as_deref(),
            _ => None,
        };
        value.map(Cow::Borrowed)
    }
}

pub fn fruits() -> Vec<Fruit> {
    vec![
        Fruit::grown_in(1, "Apple", "USA"),
        Fruit::grown_in(2, "Banana", "Ecuador"),
        Fruit::grown_in(3, "Cherry", "Turkey"),
        Fruit::grown_in(4, "Orange", "Spain"),
        Fruit::grown_in(5, "Mango", "India"),
        Fruit {
            id: 6,
            title: None,
            origin: None,
        },
    ]
}

/// `count` JSON items numbered from `start`, titled "Item N".
pub fn json_items(start: u32, count: u32) -> Vec<Item> {
    (start..start + count)
        .map(|n| {
            json!({
                "id": n,
                "title": format!("Item {n}"),
                "subtitle": format!("Entry number {n}"),
            })
        })
        .collect()
}

/// An in-memory source over `json_items(start, count)` with pages of 3.
pub fn json_source(start: u32, count: u32) -> Arc<dyn PageSource<Item>> {
    Arc::new(VecPageSource::new(json_items(start, count), 3))
}

/// Creates a test App with page size 3 searching title and subtitle.
pub fn test_app() -> App {
    App::new(
        json_source(0, 10),
        3,
        SearchOptions::with_fields(["title", "subtitle"]),
    )
}
