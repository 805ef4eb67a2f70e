//! Where a storefront sends cart operations.
//!
//! Both backends speak in the same types (`CartOutcome`, `CartView`), so the
//! state containers above them cannot tell which one they are talking to.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use shopcart_cart::{CartLine, CartOutcome, CartService, CartStore, CartView, LineChange, StockExceeded};
use shopcart_catalog::{CatalogStore, CategoryFilter, Product};
use shopcart_core::{CartLineId, ProductId};

use crate::ClientError;

#[async_trait]
pub trait CartBackend: Send + Sync {
    async fn products(&self, filter: &CategoryFilter) -> Result<Vec<Product>, ClientError>;

    async fn categories(&self) -> Result<Vec<String>, ClientError>;

    async fn cart(&self) -> Result<CartView, ClientError>;

    async fn add(&self, product_id: ProductId) -> Result<CartOutcome, ClientError>;

    async fn set_quantity(&self, line_id: CartLineId, qty: i64) -> Result<CartOutcome, ClientError>;

    async fn remove(&self, line_id: CartLineId) -> Result<CartOutcome, ClientError>;
}

#[async_trait]
impl<B> CartBackend for Arc<B>
where
    B: CartBackend + ?Sized,
{
    async fn products(&self, filter: &CategoryFilter) -> Result<Vec<Product>, ClientError> {
        (**self).products(filter).await
    }

    async fn categories(&self) -> Result<Vec<String>, ClientError> {
        (**self).categories().await
    }

    async fn cart(&self) -> Result<CartView, ClientError> {
        (**self).cart().await
    }

    async fn add(&self, product_id: ProductId) -> Result<CartOutcome, ClientError> {
        (**self).add(product_id).await
    }

    async fn set_quantity(&self, line_id: CartLineId, qty: i64) -> Result<CartOutcome, ClientError> {
        (**self).set_quantity(line_id, qty).await
    }

    async fn remove(&self, line_id: CartLineId) -> Result<CartOutcome, ClientError> {
        (**self).remove(line_id).await
    }
}

/// Calls a `CartService` directly, no network in between.
pub struct InProcessBackend<C, K> {
    service: Arc<CartService<C, K>>,
}

impl<C, K> InProcessBackend<C, K> {
    pub fn new(service: Arc<CartService<C, K>>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<C, K> CartBackend for InProcessBackend<C, K>
where
    C: CatalogStore + 'static,
    K: CartStore + 'static,
{
    async fn products(&self, filter: &CategoryFilter) -> Result<Vec<Product>, ClientError> {
        Ok(self.service.list_catalog(filter).await?)
    }

    async fn categories(&self) -> Result<Vec<String>, ClientError> {
        Ok(self.service.categories().await?)
    }

    async fn cart(&self) -> Result<CartView, ClientError> {
        Ok(self.service.cart().await?)
    }

    async fn add(&self, product_id: ProductId) -> Result<CartOutcome, ClientError> {
        Ok(self.service.add(product_id, 1).await?)
    }

    async fn set_quantity(&self, line_id: CartLineId, qty: i64) -> Result<CartOutcome, ClientError> {
        Ok(self.service.set_quantity(line_id, qty).await?)
    }

    async fn remove(&self, line_id: CartLineId) -> Result<CartOutcome, ClientError> {
        Ok(self.service.remove(line_id).await?)
    }
}

/// Talks to the REST API.
pub struct HttpBackend {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

/// Wire shape of a cart mutation response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MutationBody {
    kind: String,
    line: Option<CartLine>,
    #[serde(default)]
    removed: Option<CartLine>,
    #[serde(default)]
    stock_exceeded: Option<StockExceeded>,
}

impl MutationBody {
    fn into_outcome(self) -> Result<CartOutcome, ClientError> {
        let missing = || ClientError::Parse(format!("`{}` response without a line", self.kind));
        let change = match self.kind.as_str() {
            "created" => LineChange::Created(self.line.clone().ok_or_else(missing)?),
            "updated" => LineChange::Updated(self.line.clone().ok_or_else(missing)?),
            "unchanged" => LineChange::Unchanged(self.line.clone().ok_or_else(missing)?),
            "removed" => LineChange::Removed(self.removed.clone()),
            other => return Err(ClientError::Parse(format!("unknown change kind `{other}`"))),
        };
        Ok(CartOutcome {
            change,
            stock_exceeded: self.stock_exceeded,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_token(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::new(base_url)
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let req = self.client.request(method, url);
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send<T>(&self, req: reqwest::RequestBuilder) -> Result<T, ClientError>
    where
        T: serde::de::DeserializeOwned,
    {
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "API request failed");
            return Err(match serde_json::from_str::<ErrorBody>(&text) {
                Ok(body) => ClientError::Api {
                    status: status.as_u16(),
                    code: body.error,
                    message: body.message,
                },
                Err(_) => ClientError::Api {
                    status: status.as_u16(),
                    code: "unknown".to_string(),
                    message: text,
                },
            });
        }
        Ok(resp.json().await?)
    }

    async fn mutate(&self, req: reqwest::RequestBuilder) -> Result<CartOutcome, ClientError> {
        self.send::<MutationBody>(req).await?.into_outcome()
    }
}

#[async_trait]
impl CartBackend for HttpBackend {
    async fn products(&self, filter: &CategoryFilter) -> Result<Vec<Product>, ClientError> {
        let mut req = self.request(reqwest::Method::GET, "/api/products");
        if let Some(category) = filter.as_query() {
            req = req.query(&[("category", category)]);
        }
        self.send(req).await
    }

    async fn categories(&self) -> Result<Vec<String>, ClientError> {
        self.send(self.request(reqwest::Method::GET, "/api/products/categories"))
            .await
    }

    async fn cart(&self) -> Result<CartView, ClientError> {
        self.send(self.request(reqwest::Method::GET, "/api/cart")).await
    }

    async fn add(&self, product_id: ProductId) -> Result<CartOutcome, ClientError> {
        let req = self
            .request(reqwest::Method::POST, "/api/cart")
            .json(&json!({ "productId": product_id }));
        self.mutate(req).await
    }

    async fn set_quantity(&self, line_id: CartLineId, qty: i64) -> Result<CartOutcome, ClientError> {
        let req = self
            .request(reqwest::Method::PUT, &format!("/api/cart/{line_id}"))
            .json(&json!({ "qty": qty }));
        self.mutate(req).await
    }

    async fn remove(&self, line_id: CartLineId) -> Result<CartOutcome, ClientError> {
        self.mutate(self.request(reqwest::Method::DELETE, &format!("/api/cart/{line_id}")))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutation_body_maps_kinds() {
        let line = CartLine::first(ProductId::new());

        let body: MutationBody = serde_json::from_value(json!({
            "kind": "unchanged",
            "line": line,
            "stockExceeded": { "available": 3 },
            "message": "Only 3 items in stock!",
        }))
        .unwrap();
        let outcome = body.into_outcome().unwrap();
        assert_eq!(outcome.change, LineChange::Unchanged(line.clone()));
        assert_eq!(outcome.stock_exceeded, Some(StockExceeded { available: 3 }));

        let body: MutationBody = serde_json::from_value(json!({
            "kind": "removed",
            "line": null,
            "message": "Item removed from cart",
        }))
        .unwrap();
        assert_eq!(body.into_outcome().unwrap().change, LineChange::Removed(None));
    }

    #[test]
    fn unknown_kind_is_a_parse_error() {
        let body: MutationBody =
            serde_json::from_value(json!({ "kind": "exploded", "line": null })).unwrap();
        assert!(matches!(body.into_outcome(), Err(ClientError::Parse(_))));
    }

    #[test]
    fn base_url_loses_trailing_slash() {
        assert_eq!(HttpBackend::new("http://localhost:4000/").base_url, "http://localhost:4000");
    }
}
