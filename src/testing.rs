//! In-process catalog for controller tests. Responses are scripted per key and
//! can be held back behind a gate to force an arrival order.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::catalog::{CatalogError, ProductCatalog};
use crate::product::model::{ProductDetail, ProductSummary, SearchPage};

#[derive(Default)]
pub struct FakeCatalog {
    products: Mutex<HashMap<String, Result<ProductDetail, CatalogError>>>,
    pages: Mutex<HashMap<(String, u32), Result<SearchPage, CatalogError>>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    lookups: Mutex<Vec<String>>,
    searches: Mutex<Vec<(String, u32)>>,
}

fn search_key(query: &str, page: u32) -> String {
    format!("search:{query}#{page}")
}

fn product_key(code: &str) -> String {
    format!("product:{code}")
}

impl FakeCatalog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_product(&self, code: &str, result: Result<ProductDetail, CatalogError>) {
        self.products.lock().unwrap().insert(code.into(), result);
    }

    pub fn set_page(&self, query: &str, page: u32, result: Result<SearchPage, CatalogError>) {
        self.pages
            .lock()
            .unwrap()
            .insert((query.into(), page), result);
    }

    /// Holds the lookup for `code` until the returned handle is notified.
    pub fn gate_product(&self, code: &str) -> Arc<Notify> {
        self.gate(product_key(code))
    }

    /// Holds the search for `(query, page)` until the returned handle is notified.
    pub fn gate_search(&self, query: &str, page: u32) -> Arc<Notify> {
        self.gate(search_key(query, page))
    }

    fn gate(&self, key: String) -> Arc<Notify> {
        self.gates
            .lock()
            .unwrap()
            .entry(key)
            .or_insert_with(|| Arc::new(Notify::new()))
            .clone()
    }

    async fn wait_gate(&self, key: &str) {
        let gate = self.gates.lock().unwrap().get(key).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }

    pub fn searches(&self) -> Vec<(String, u32)> {
        self.searches.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProductCatalog for FakeCatalog {
    async fn product_by_code(&self, code: &str) -> Result<ProductDetail, CatalogError> {
        self.lookups.lock().unwrap().push(code.to_string());
        self.wait_gate(&product_key(code)).await;
        self.products
            .lock()
            .unwrap()
            .get(code)
            .cloned()
            .unwrap_or(Err(CatalogError::NotFound))
    }

    async fn search_products(&self, query: &str, page: u32) -> Result<SearchPage, CatalogError> {
        self.searches
            .lock()
            .unwrap()
            .push((query.to_string(), page));
        self.wait_gate(&search_key(query, page)).await;
        self.pages
            .lock()
            .unwrap()
            .get(&(query.to_string(), page))
            .cloned()
            .unwrap_or_else(|| Err(CatalogError::Network("no scripted page".into())))
    }
}

pub fn summary(code: &str) -> ProductSummary {
    ProductSummary {
        code: code.into(),
        name: Some(format!("Product {code}")),
        nutrition_grade: None,
        category_tags: vec![],
        image_url: None,
    }
}

pub fn detail(code: &str) -> ProductDetail {
    ProductDetail {
        code: code.into(),
        name: Some(format!("Product {code}")),
        ..ProductDetail::default()
    }
}

/// A page holding `count` items with codes `{prefix}{offset}..`.
pub fn page(prefix: &str, offset: usize, count: usize, page: u32, total_count: u64) -> SearchPage {
    SearchPage {
        items: (offset..offset + count)
            .map(|i| summary(&format!("{prefix}{i}")))
            .collect(),
        page,
        total_count,
    }
}
