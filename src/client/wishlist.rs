use crate::dispatch::RequestDispatcher;
use crate::errors::Error;
use crate::types::{AddToWishlistRequest, Product};

/// Typed calls for per-user wishlists. User ids are free-form strings and
/// get percent-encoded before landing in a path segment.
pub struct WishlistApi<'a> {
    dispatcher: &'a RequestDispatcher,
}

impl<'a> WishlistApi<'a> {
    pub(crate) fn new(dispatcher: &'a RequestDispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn get(&self, user_id: &str) -> Result<Vec<Product>, Error> {
        let uid = urlencoding::encode(user_id);
        self.dispatcher
            .get(&format!("/wishlist/{uid}"))
            .await?
            .decode()
    }

    /// The server answers these mutation endpoints with a plain-text
    /// confirmation rather than structured data.
    pub async fn add(&self, product_id: u64, user_id: &str) -> Result<String, Error> {
        let request = AddToWishlistRequest {
            product_id,
            user_id: user_id.to_string(),
        };
        self.dispatcher.post("/wishlist", &request).await?.decode()
    }

    pub async fn remove(&self, product_id: u64, user_id: &str) -> Result<String, Error> {
        let uid = urlencoding::encode(user_id);
        self.dispatcher
            .delete(&format!("/wishlist/user/{uid}/product/{product_id}"))
            .await?
            .decode()
    }
}
