use crate::routes::category::schemas::{validate_slug, CreateCategoryRequest, UpdateCategoryRequest};

#[test]
fn test_slug_validation() {
    assert!(validate_slug("smart-phones").is_ok());
    assert!(validate_slug("tv2").is_ok());
    assert!(validate_slug("Smart Phones").is_err());
    assert!(validate_slug("-phones").is_err());
    assert!(validate_slug("").is_err());
}

#[test]
fn test_category_requests_are_validated() {
    let request = CreateCategoryRequest {
        name_ka: "ტელეფონები".to_string(),
        name_en: "Phones".to_string(),
        slug: "phones".to_string(),
        parent_id: None,
    };
    assert!(request.validate().is_ok());

    let request = CreateCategoryRequest {
        name_en: " ".to_string(),
        ..request
    };
    assert!(request.validate().is_err());

    let update = UpdateCategoryRequest {
        parent_id: Some(4),
        ..Default::default()
    };
    assert!(update.validate(4).is_err());
    assert!(update.validate(5).is_ok());
}
