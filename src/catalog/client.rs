use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::instrument;

use super::dto::{ProductResponse, SearchResponse, SEARCH_FIELDS};
use super::{CatalogError, ProductCatalog};
use crate::config::CatalogConfig;
use crate::product::model::{ProductDetail, SearchPage};

/// `ProductCatalog` backed by the Open Food Facts v2 HTTP API.
#[derive(Debug, Clone)]
pub struct OpenFoodFactsClient {
    client: Client,
    base_url: Url,
    page_size: u32,
}

impl OpenFoodFactsClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let raw = &config.base_url;
        let base_url = Url::parse(raw)
            .map_err(|e| CatalogError::Validation(format!("base url {raw}: {e}")))?;
        if base_url.cannot_be_a_base() {
            let msg = format!("base url {raw} cannot be a base");
            return Err(CatalogError::Validation(msg));
        }
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CatalogError::Network(format!("build http client: {e}")))?;
        Ok(Self {
            client,
            base_url,
            page_size: config.page_size,
        })
    }

    /// Appends path segments to the base url, escaping each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "catalog request failed");
                CatalogError::Network(e.to_string())
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, body = %body, "catalog returned an error");
            return Err(CatalogError::Network(format!("catalog returned {status}")));
        }

        response.json::<T>().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse catalog response");
            CatalogError::Decode(e.to_string())
        })
    }
}

#[async_trait]
impl ProductCatalog for OpenFoodFactsClient {
    #[instrument(skip(self))]
    async fn product_by_code(&self, code: &str) -> Result<ProductDetail, CatalogError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(CatalogError::Validation("product code is empty".into()));
        }
        let url = self.endpoint(&["product", code]);
        let response: ProductResponse = self.get_json(url, &[]).await?;
        response.into_detail()
    }

    #[instrument(skip(self))]
    async fn search_products(&self, query: &str, page: u32) -> Result<SearchPage, CatalogError> {
        let url = self.endpoint(&["search"]);
        // The query is matched against both the category and the product name.
        let params = [
            ("categories_tags_en", query.to_string()),
            ("product_name", query.to_string()),
            ("page", page.max(1).to_string()),
            ("page_size", self.page_size.to_string()),
            ("fields", SEARCH_FIELDS.to_string()),
        ];
        let response: SearchResponse = self.get_json(url, &params).await?;
        let page = SearchPage::from(response);
        tracing::debug!(
            items = page.items.len(),
            page = page.page,
            total = page.total_count,
            "search page received"
        );
        Ok(page)
    }
}
