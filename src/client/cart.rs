use serde_json::json;

use crate::dispatch::RequestDispatcher;
use crate::errors::Error;
use crate::types::{AddToCartRequest, Cart, CartItem};

/// Typed calls for the shopping cart of the authenticated user.
pub struct CartApi<'a> {
    dispatcher: &'a RequestDispatcher,
}

impl<'a> CartApi<'a> {
    pub(crate) fn new(dispatcher: &'a RequestDispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn get(&self) -> Result<Cart, Error> {
        self.dispatcher.get("/cart").await?.decode()
    }

    pub async fn add(&self, product_id: u64, quantity: u32) -> Result<CartItem, Error> {
        let request = AddToCartRequest {
            product_id,
            quantity,
        };
        self.dispatcher
            .post("/cart/items", &request)
            .await?
            .decode()
    }

    /// Set the quantity of one line item. The server answers with the updated
    /// item, or an empty body when the item was removed by the change.
    pub async fn update_quantity(
        &self,
        product_id: u64,
        quantity: u32,
    ) -> Result<Option<CartItem>, Error> {
        // The quantity travels in the query string; the body is an empty
        // JSON object.
        let endpoint = format!("/cart/items/{product_id}?quantity={quantity}");
        self.dispatcher.put(&endpoint, &json!({})).await?.decode()
    }

    pub async fn remove(&self, product_id: u64) -> Result<(), Error> {
        self.dispatcher
            .delete(&format!("/cart/items/{product_id}"))
            .await?
            .decode()
    }

    pub async fn clear(&self) -> Result<(), Error> {
        self.dispatcher.delete("/cart").await?.decode()
    }
}
