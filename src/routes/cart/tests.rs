use chrono::Utc;
use uuid::Uuid;

use crate::routes::cart::errors::CartError;
use crate::routes::cart::models::CartItemModel;
use crate::routes::cart::schemas::{AddCartItemRequest, CartItem};
use crate::routes::cart::utils::{
    add_cart_item, cart_total, clear_cart, fetch_cart, update_cart_item, validate_quantity,
    MAX_CART_QUANTITY,
};
use crate::routes::product::schemas::CreateProductRequest;
use crate::routes::product::utils::save_product;
use crate::routes::user::tests::setup_user;
use crate::schemas::Language;
use crate::tests::tests::get_test_pool;

fn cart_item(price: i64, quantity: i32) -> CartItem {
    CartItem {
        product_id: 1,
        name: "ტელეფონი".to_string(),
        price,
        image: None,
        quantity,
        created_on: Utc::now(),
    }
}

#[test]
fn test_cart_total() {
    assert_eq!(cart_total(&[]).unwrap(), 0);
    assert_eq!(cart_total(&[cart_item(2500, 2), cart_item(100, 3)]).unwrap(), 5300);
    assert!(cart_total(&[cart_item(i64::MAX, 2)]).is_err());
}

#[test]
fn test_quantity_bounds() {
    assert!(validate_quantity(1, false).is_ok());
    assert!(validate_quantity(0, false).is_err());
    assert!(validate_quantity(0, true).is_ok());
    assert!(validate_quantity(-1, true).is_err());
    assert!(validate_quantity(MAX_CART_QUANTITY, false).is_ok());
    assert!(validate_quantity(MAX_CART_QUANTITY + 1, true).is_err());
    assert!(validate_quantity(i32::MAX, false).is_err());
}

#[test]
fn test_cart_item_becomes_line_item() {
    let model = CartItemModel {
        product_id: 7,
        name: "Phone".to_string(),
        price: 2500,
        image: Some("https://cdn.storefront.ge/7.jpg".to_string()),
        quantity: 3,
        created_on: Utc::now(),
    };
    let line_item = model.into_line_item();
    assert_eq!(line_item.product_id, 7);
    assert_eq!(line_item.quantity, 3);
    assert_eq!(line_item.image.as_deref(), Some("https://cdn.storefront.ge/7.jpg"));
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_cart_add_merge_and_remove() {
    let pool = get_test_pool().await;
    let email = format!("{}@storefront.ge", Uuid::new_v4().simple());
    let user_id = setup_user(&pool, &email, "tbilisi-2024").await.unwrap();
    let product = CreateProductRequest {
        category_id: None,
        name_ka: "ტელეფონი".to_string(),
        name_en: "Phone".to_string(),
        description_ka: None,
        description_en: None,
        price: 2500,
        stock: 10,
        images: vec!["https://cdn.storefront.ge/1.jpg".to_string()],
    };
    let product_id = save_product(&pool, &product, Language::En).await.unwrap().id;

    let request = AddCartItemRequest {
        product_id,
        quantity: 1,
    };
    add_cart_item(&pool, user_id, &request, Language::En).await.unwrap();
    add_cart_item(&pool, user_id, &request, Language::En).await.unwrap();
    let cart = fetch_cart(&pool, user_id).await.unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 2);
    assert_eq!(cart.items[0].name, "Phone");
    assert_eq!(cart.total, 5000);

    // merging past the cap is rejected and leaves the line as it was
    let bulk = AddCartItemRequest {
        product_id,
        quantity: MAX_CART_QUANTITY,
    };
    assert!(matches!(
        add_cart_item(&pool, user_id, &bulk, Language::En).await,
        Err(CartError::ValidationError(_))
    ));
    assert!(matches!(
        update_cart_item(&pool, user_id, product_id, i32::MAX).await,
        Err(CartError::ValidationError(_))
    ));
    assert_eq!(fetch_cart(&pool, user_id).await.unwrap().items[0].quantity, 2);

    update_cart_item(&pool, user_id, product_id, 0).await.unwrap();
    assert!(fetch_cart(&pool, user_id).await.unwrap().items.is_empty());
    assert!(update_cart_item(&pool, user_id, product_id, 2).await.is_err());
    clear_cart(&pool, user_id).await.unwrap();
}
