//! Product browsing and the seller's product form.

use multivendor_integration_tests::{BUYER_EMAIL, SELLER_EMAIL, TestApp};
use multivendor_storefront::views::product_form::PERMISSION_MESSAGE;
use reqwest::StatusCode;

#[tokio::test]
async fn test_listing_is_public_but_shopping_needs_a_buyer() {
    let app = TestApp::start().await;

    let page = app.get("/all-products").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Wireless Mouse"));
    assert!(page.body.contains("$19.99"));
    assert!(page.body.contains("Out of stock"));
    assert!(!page.body.contains("Add to Wishlist"));

    app.sign_in(BUYER_EMAIL).await;
    let page = app.get("/all-products").await;
    assert!(page.body.contains("Add to Wishlist"));
    assert!(page.body.contains("Add to Cart"));
}

#[tokio::test]
async fn test_category_page_asks_for_that_category() {
    let app = TestApp::start().await;

    let page = app.get("/products/Home%20and%20Kitchen").await;

    assert!(page.body.contains("Products in Home and Kitchen Category"));
    assert!(page.body.contains("Chef Knife"));
    assert!(!page.body.contains("Wireless Mouse"));
    assert_eq!(
        app.backend.requests(),
        vec!["GET /category/Home%20and%20Kitchen".to_string()]
    );
}

#[tokio::test]
async fn test_product_detail_offers_edit_to_sellers_only() {
    let app = TestApp::start().await;

    let page = app.get("/product/p3").await;
    assert!(page.body.contains("Chef Knife"));
    assert!(page.body.contains("4 in stock"));
    assert!(!page.body.contains("Edit Product"));

    app.sign_in(SELLER_EMAIL).await;
    let page = app.get("/product/p3").await;
    assert!(page.body.contains("href=\"/edit-product/p3\""));
}

#[tokio::test]
async fn test_missing_product_shows_service_message() {
    let app = TestApp::start().await;

    let page = app.get("/product/nope").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Product not found"));
}

#[tokio::test]
async fn test_edit_form_is_filled_from_stored_product() {
    let app = TestApp::start().await;
    app.sign_in(SELLER_EMAIL).await;

    let page = app.get("/edit-product/p1").await;

    assert!(page.body.contains("Edit Product"));
    assert!(page.body.contains("action=\"/edit-product/p1\""));
    assert!(page.body.contains("value=\"Wireless Mouse\""));
    assert!(page.body.contains("value=\"10\""));
    assert!(page.body.contains("value=\"19.99\""));
    assert!(page.body.contains("<option value=\"Electronics\" selected>"));
    assert!(page.body.contains("value=\"Acme Goods\""));
}

#[tokio::test]
async fn test_seller_creates_product() {
    let app = TestApp::start().await;
    app.sign_in(SELLER_EMAIL).await;

    let page = app
        .post(
            "/add-product",
            &[
                ("name", "Desk Lamp"),
                ("desc", "Warm light"),
                ("img", "https://img.example.com/item.png"),
                ("type", "Furniture"),
                ("stock", "7"),
                ("price", "12.50"),
                ("available", "on"),
                ("seller", "Acme Goods"),
            ],
        )
        .await;

    assert!(page.body.contains("Product created successfully!"), "{}", page.body);
    assert!(!page.body.contains("value=\"Desk Lamp\""));

    let created = app
        .backend
        .products()
        .into_iter()
        .find(|p| p["name"] == "Desk Lamp")
        .expect("product was created");
    assert_eq!(created["type"], "Furniture");
    assert_eq!(created["stock"], 7);
    assert_eq!(created["price"].as_f64(), Some(12.5));
    assert_eq!(created["available"], true);
}

#[tokio::test]
async fn test_seller_updates_product() {
    let app = TestApp::start().await;
    app.sign_in(SELLER_EMAIL).await;

    let page = app
        .post(
            "/edit-product/p1",
            &[
                ("name", "Wireless Mouse"),
                ("desc", "Now quieter"),
                ("img", "https://img.example.com/item.png"),
                ("type", "Electronics"),
                ("stock", "3"),
                ("price", "17.00"),
                ("seller", "Acme Goods"),
            ],
        )
        .await;

    assert!(page.body.contains("Product updated successfully!"), "{}", page.body);
    let product = app.backend.product("p1").expect("product exists");
    assert_eq!(product["desc"], "Now quieter");
    assert_eq!(product["stock"], 3);
    assert_eq!(product["available"], false);
}

#[tokio::test]
async fn test_invalid_form_sends_nothing() {
    let app = TestApp::start().await;
    app.sign_in(SELLER_EMAIL).await;
    app.backend.clear_requests();

    let page = app
        .post(
            "/add-product",
            &[
                ("name", ""),
                ("type", "Electronics"),
                ("stock", "1"),
                ("price", "1"),
            ],
        )
        .await;

    assert!(page.body.contains("Product name is required."));
    assert_eq!(app.backend.request_count(), 0);
}

#[tokio::test]
async fn test_rejected_edit_keeps_what_was_typed() {
    let app = TestApp::start().await;
    app.sign_in(SELLER_EMAIL).await;
    app.backend.clear_requests();

    let page = app
        .post(
            "/edit-product/p1",
            &[
                ("name", "Silent Mouse"),
                ("desc", "Now quieter"),
                ("img", "https://img.example.com/item.png"),
                ("type", "Electronics"),
                ("stock", "three"),
                ("price", "17.00"),
                ("seller", "Acme Goods"),
            ],
        )
        .await;

    assert!(page.body.contains("Stock must be a whole number."));
    assert!(page.body.contains("action=\"/edit-product/p1\""));
    assert!(page.body.contains("value=\"Silent Mouse\""));
    assert!(page.body.contains("value=\"three\""));
    assert!(page.body.contains("<option value=\"Electronics\" selected>"));
    assert_eq!(app.backend.request_count(), 0);
}

#[tokio::test]
async fn test_buyer_cannot_use_product_form() {
    let app = TestApp::start().await;
    app.sign_in(BUYER_EMAIL).await;
    app.backend.clear_requests();

    let page = app.get("/edit-product/p1").await;
    assert!(page.body.contains(PERMISSION_MESSAGE));
    assert!(!page.body.contains("<form method=\"post\" action=\"/edit-product"));

    let page = app
        .post(
            "/add-product",
            &[
                ("name", "Sneaky"),
                ("type", "Electronics"),
                ("stock", "1"),
                ("price", "1"),
            ],
        )
        .await;
    assert!(page.body.contains(PERMISSION_MESSAGE));
    assert_eq!(app.backend.request_count(), 0);
}
