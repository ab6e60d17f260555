use crate::dispatch::RequestDispatcher;
use crate::errors::Error;
use crate::types::{NewProduct, Product, ProductSort, ProductUpdate};

/// Typed calls for the product catalog. Carries no auth or retry logic of
/// its own.
pub struct ProductsApi<'a> {
    dispatcher: &'a RequestDispatcher,
}

impl<'a> ProductsApi<'a> {
    pub(crate) fn new(dispatcher: &'a RequestDispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn list(&self, sort: Option<ProductSort>) -> Result<Vec<Product>, Error> {
        let endpoint = match sort {
            Some(sort) => format!("/products?sortBy={sort}"),
            None => "/products".to_string(),
        };
        self.dispatcher.get(&endpoint).await?.decode()
    }

    pub async fn get(&self, id: u64) -> Result<Product, Error> {
        self.dispatcher
            .get(&format!("/products/{id}"))
            .await?
            .decode()
    }

    pub async fn create(&self, product: &NewProduct) -> Result<Product, Error> {
        self.dispatcher.post("/products", product).await?.decode()
    }

    pub async fn update(&self, id: u64, changes: &ProductUpdate) -> Result<Product, Error> {
        self.dispatcher
            .put(&format!("/products/{id}"), changes)
            .await?
            .decode()
    }

    pub async fn delete(&self, id: u64) -> Result<(), Error> {
        self.dispatcher
            .delete(&format!("/products/{id}"))
            .await?
            .decode()
    }
}
