use chrono::Utc;

use crate::routes::product::models::ProductModel;
use crate::routes::product::schemas::{CreateProductRequest, UpdateProductRequest};
use crate::routes::product::utils::search_pattern;
use crate::schemas::Language;

fn product_model() -> ProductModel {
    ProductModel {
        id: 1,
        category_id: Some(3),
        name_ka: "ტელეფონი".to_string(),
        name_en: "Phone".to_string(),
        description_ka: None,
        description_en: Some("Smart phone".to_string()),
        price: 2500,
        stock: 4,
        images: sqlx::types::Json(vec!["https://cdn.storefront.ge/1.jpg".to_string()]),
        is_active: true,
        created_on: Utc::now(),
    }
}

#[test]
fn test_search_pattern_escapes_wildcards() {
    assert_eq!(search_pattern(Some("phone")), Some("%phone%".to_string()));
    assert_eq!(search_pattern(Some(" 100%_off ")), Some("%100\\%\\_off%".to_string()));
    assert_eq!(search_pattern(Some("   ")), None);
    assert_eq!(search_pattern(None), None);
}

#[test]
fn test_product_is_localized() {
    let product = product_model().into_schema(Language::Ka);
    assert_eq!(product.name, "ტელეფონი");
    // falls back to the only available description
    assert_eq!(product.description.as_deref(), Some("Smart phone"));

    let product = product_model().into_schema(Language::En);
    assert_eq!(product.name, "Phone");
    assert_eq!(product.name_ka, "ტელეფონი");
}

#[test]
fn test_product_price_must_be_positive() {
    let request = CreateProductRequest {
        category_id: None,
        name_ka: "ტელეფონი".to_string(),
        name_en: "Phone".to_string(),
        description_ka: None,
        description_en: None,
        price: 0,
        stock: 1,
        images: vec![],
    };
    assert!(request.validate().is_err());

    let update = UpdateProductRequest {
        stock: Some(-1),
        ..Default::default()
    };
    assert!(update.validate().is_err());
    assert!(UpdateProductRequest::default().validate().is_ok());
}
