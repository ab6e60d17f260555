use storefront_client::types::ProductSort;
use storefront_client::{Config, StorefrontClient};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional: enable basic logging for the demo
    let _ = tracing_subscriber::fmt().try_init();

    // Point this at a running storefront backend
    let base = std::env::var("STOREFRONT_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:8080".to_string());
    let config = Config::from_base_url(&base);

    let client = StorefrontClient::builder(config)
        .on_session_expired(|| println!("session expired, please login again"))
        .build()?;

    let identity = client.login("demo", "demo-password").await?;
    println!("logged in as {} ({:?})", identity.username, identity.role);

    let products = client.products().list(Some(ProductSort::PriceAsc)).await?;
    println!("{} products in the catalog", products.len());

    if let Some(first) = products.first() {
        let item = client.cart().add(first.id, 1).await?;
        println!(
            "added '{}' x{} to the cart",
            item.product_name, item.quantity
        );
    }

    let cart = client.cart().get().await?;
    println!(
        "cart total: {:.2} ({} items)",
        cart.total_price, cart.total_items
    );

    client.logout().await?;
    Ok(())
}
