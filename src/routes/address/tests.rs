use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::MobileNo;
use crate::routes::address::schemas::{CreateAddressRequest, UpdateAddressRequest};
use crate::routes::address::utils::{
    create_address, delete_address, fetch_addresses, next_default_candidate,
    set_default_address, should_become_default, update_address,
};
use crate::routes::user::tests::setup_user;
use crate::routes::user::utils::hard_delete_user_account;
use crate::tests::tests::get_test_pool;

fn address_request(label: &str, is_default: bool) -> CreateAddressRequest {
    CreateAddressRequest {
        label: label.to_string(),
        recipient_name: "Nino Beridze".to_string(),
        mobile_no: MobileNo::parse("599123456".to_string()).unwrap(),
        city: "Tbilisi".to_string(),
        street_address: "Rustaveli Ave 12".to_string(),
        postal_code: Some("0108".to_string()),
        is_default,
    }
}

#[test]
fn test_first_address_becomes_default() {
    assert!(should_become_default(false, 0));
    assert!(should_become_default(true, 3));
    assert!(!should_become_default(false, 2));
}

#[test]
fn test_newest_address_inherits_default() {
    let now = Utc::now();
    let older = Uuid::new_v4();
    let newest = Uuid::new_v4();
    let remaining = vec![(older, now - Duration::days(3)), (newest, now)];
    assert_eq!(next_default_candidate(&remaining), Some(newest));
    assert_eq!(next_default_candidate(&[]), None);
}

#[test]
fn test_address_validation() {
    let mut request = address_request("Home", false);
    assert!(request.validate().is_ok());
    request.city = "  ".to_string();
    assert_eq!(request.validate(), Err("city is required".to_string()));

    let update = UpdateAddressRequest {
        mobile_no: Some("12345".to_string()),
        ..Default::default()
    };
    assert!(update.validate().is_err());
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_single_default_address_across_flows() {
    let pool = get_test_pool().await;
    let email = format!("{}@storefront.ge", Uuid::new_v4().simple());
    let user_id = setup_user(&pool, &email, "tbilisi-2024").await.unwrap();
    let default_count = |addresses: &[crate::routes::address::schemas::Address]| {
        addresses.iter().filter(|address| address.is_default).count()
    };

    let home = create_address(&pool, user_id, &address_request("Home", false))
        .await
        .unwrap();
    assert!(home.is_default);
    let office = create_address(&pool, user_id, &address_request("Office", true))
        .await
        .unwrap();
    let addresses = fetch_addresses(&pool, user_id).await.unwrap();
    assert_eq!(default_count(&addresses), 1);
    assert_eq!(addresses[0].id, office.id);

    let update = UpdateAddressRequest {
        is_default: Some(true),
        ..Default::default()
    };
    update_address(&pool, user_id, home.id, &update).await.unwrap();
    let addresses = fetch_addresses(&pool, user_id).await.unwrap();
    assert_eq!(default_count(&addresses), 1);
    assert_eq!(addresses[0].id, home.id);

    // setting the same default twice leaves exactly one default
    set_default_address(&pool, user_id, office.id).await.unwrap();
    set_default_address(&pool, user_id, office.id).await.unwrap();
    let addresses = fetch_addresses(&pool, user_id).await.unwrap();
    assert_eq!(default_count(&addresses), 1);
    assert_eq!(addresses[0].id, office.id);

    delete_address(&pool, user_id, office.id).await.unwrap();
    let addresses = fetch_addresses(&pool, user_id).await.unwrap();
    assert_eq!(addresses.len(), 1);
    assert_eq!(default_count(&addresses), 1);

    hard_delete_user_account(&pool, user_id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_concurrent_first_addresses_keep_one_default() {
    let pool = get_test_pool().await;
    let email = format!("{}@storefront.ge", Uuid::new_v4().simple());
    let user_id = setup_user(&pool, &email, "tbilisi-2024").await.unwrap();

    let home = address_request("Home", false);
    let office = address_request("Office", false);
    let (first, second) = tokio::join!(
        create_address(&pool, user_id, &home),
        create_address(&pool, user_id, &office),
    );
    let (first, second) = (first.unwrap(), second.unwrap());
    assert!(first.is_default != second.is_default);

    let addresses = fetch_addresses(&pool, user_id).await.unwrap();
    assert_eq!(addresses.len(), 2);
    assert_eq!(addresses.iter().filter(|address| address.is_default).count(), 1);

    hard_delete_user_account(&pool, user_id).await.unwrap();
}
