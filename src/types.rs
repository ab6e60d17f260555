//! Wire types exchanged with the storefront API.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Payload returned by the identity endpoints on successful login,
/// registration, or refresh.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub username: String,
    pub role: Role,
    pub user_id: String,
}

impl AuthResponse {
    /// Splits the response into the credential/identity pair that is stored
    /// together.
    pub fn into_parts(self) -> (Credential, Identity) {
        let AuthResponse {
            access_token,
            refresh_token,
            token_type,
            username,
            role,
            user_id,
        } = self;
        (
            Credential {
                access_token,
                refresh_token,
                token_type,
            },
            Identity {
                username,
                role,
                id: user_id,
            },
        )
    }
}

/// Bearer credential pair issued by the identity endpoints. Both tokens are
/// always stored and cleared together; no partial state is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

/// Signed-in user record, persisted alongside the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    pub role: Role,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock_quantity: u32,
}

/// Body for `POST /products`; the server assigns the id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock_quantity: u32,
}

/// Partial update for `PUT /products/{id}`; unset fields are left out of the
/// payload entirely.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<u32>,
}

/// Server-side sort orders accepted by the product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductSort {
    Name,
    PriceAsc,
    PriceDesc,
    Stock,
}

impl fmt::Display for ProductSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductSort::Name => write!(f, "name"),
            ProductSort::PriceAsc => write!(f, "price-asc"),
            ProductSort::PriceDesc => write!(f, "price-desc"),
            ProductSort::Stock => write!(f, "stock"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub items: Vec<CartItem>,
    pub total_items: u32,
    pub total_price: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: u64,
    pub product_id: u64,
    pub product_name: String,
    pub product_price: f64,
    pub quantity: u32,
    pub subtotal: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: u64,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToWishlistRequest {
    pub product_id: u64,
    pub user_id: String,
}
