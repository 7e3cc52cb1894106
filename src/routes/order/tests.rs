use chrono::NaiveDate;
use quickcheck::{Arbitrary, Gen};
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

use crate::routes::order::schemas::{
    CheckoutRequest, OrderLineItem, OrderStatus, PaymentMethod, ShippingAddress,
};
use crate::routes::order::errors::OrderError;
use crate::routes::order::utils::{
    cancel_order, compute_total, create_order, create_order_with_numbers, fetch_order_by_no,
    generate_order_no, transition_order_status, validate_shipping_address,
};
use crate::routes::user::tests::setup_user;
use crate::tests::tests::get_test_pool;

#[derive(Clone, Copy, Debug)]
struct StatusFixture(OrderStatus);

impl Arbitrary for StatusFixture {
    fn arbitrary(g: &mut Gen) -> Self {
        Self(*g.choose(&OrderStatus::ALL).unwrap_or(&OrderStatus::Pending))
    }
}

fn line_item(product_id: i64, price: i64, quantity: i32) -> OrderLineItem {
    OrderLineItem {
        product_id,
        name: format!("Product {}", product_id),
        price,
        quantity,
        image: None,
    }
}

fn shipping_address() -> ShippingAddress {
    ShippingAddress {
        recipient_name: "Nino Beridze".to_string(),
        mobile_no: "+995 599 12 34 56".to_string(),
        city: "Tbilisi".to_string(),
        street_address: "12 Rustaveli Ave".to_string(),
        postal_code: Some("0108".to_string()),
    }
}

#[test]
fn test_compute_total() {
    assert_eq!(compute_total(&[line_item(1, 2500, 2)]), Ok(5000));
    assert_eq!(
        compute_total(&[line_item(1, 2500, 2), line_item(2, 199, 3)]),
        Ok(5597)
    );
}

#[test]
fn test_compute_total_rejects_invalid_items() {
    assert!(compute_total(&[]).is_err());
    assert!(compute_total(&[line_item(1, 0, 2)]).is_err());
    assert!(compute_total(&[line_item(1, 2500, 0)]).is_err());
    assert!(compute_total(&[line_item(1, -5, 1)]).is_err());
    assert!(compute_total(&[line_item(1, i64::MAX, 2)]).is_err());
}

#[test]
fn test_order_no_format() {
    let mut rng = StdRng::seed_from_u64(7);
    let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let order_no = generate_order_no(&mut rng, date);
    assert_eq!(order_no.len(), "ORD-20240601-XXXXXX".len());
    assert!(order_no.starts_with("ORD-20240601-"));
    assert!(order_no[13..]
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    assert!(!order_no[13..].chars().any(|c| "O0I1".contains(c)));
}

#[test]
fn test_shipping_address_is_normalized() {
    let address = validate_shipping_address(&shipping_address()).unwrap();
    assert_eq!(address.mobile_no, "599123456");

    let mut address = shipping_address();
    address.city = "  ".to_string();
    assert_eq!(
        validate_shipping_address(&address).unwrap_err(),
        "shippingAddress.city is required"
    );
}

#[test]
fn test_order_status_transitions() {
    use OrderStatus::*;
    assert!(Pending.can_transition_to(Processing));
    assert!(Pending.can_transition_to(Paid));
    assert!(Processing.can_transition_to(Paid));
    assert!(Paid.can_transition_to(Shipped));
    assert!(Shipped.can_transition_to(Delivered));
    assert!(Shipped.can_transition_to(Cancelled));
    assert!(!Paid.can_transition_to(Pending));
    assert!(!Delivered.can_transition_to(Cancelled));
    assert!(!Cancelled.can_transition_to(Pending));
    assert!(!Pending.can_transition_to(Pending));
}

#[quickcheck_macros::quickcheck]
fn terminal_states_never_transition(from: StatusFixture, to: StatusFixture) -> bool {
    !from.0.is_terminal() || !from.0.can_transition_to(to.0)
}

#[quickcheck_macros::quickcheck]
fn transitions_never_go_backwards(from: StatusFixture, to: StatusFixture) -> bool {
    let (from, to) = (from.0, to.0);
    if !from.can_transition_to(to) || to == OrderStatus::Cancelled {
        return true;
    }
    let position = |status| OrderStatus::ALL.iter().position(|s| *s == status);
    position(to) > position(from)
}

#[quickcheck_macros::quickcheck]
fn cancellation_allowed_until_terminal(from: StatusFixture) -> bool {
    from.0.can_transition_to(OrderStatus::Cancelled) == !from.0.is_terminal()
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_checkout_round_trip_and_status_flow() {
    let pool = get_test_pool().await;
    let email = format!("{}@storefront.ge", Uuid::new_v4().simple());
    let user_id = setup_user(&pool, &email, "tbilisi-2024").await.unwrap();

    let items = vec![line_item(1, 2500, 2), line_item(2, 1250, 1)];
    let request = CheckoutRequest {
        items: Some(items.clone()),
        payment_method: PaymentMethod::BankTransfer,
        delivery_method: None,
        address_id: None,
        shipping_address: Some(shipping_address()),
    };
    let order = create_order(&pool, user_id, &request).await.unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total_amount, 6250);

    let fetched = fetch_order_by_no(&pool, &order.order_no)
        .await
        .unwrap()
        .unwrap()
        .into_schema();
    assert_eq!(fetched.items, items);

    let paid = transition_order_status(&pool, &order.order_no, OrderStatus::Paid)
        .await
        .unwrap();
    assert_eq!(paid.status, OrderStatus::Paid);
    assert!(transition_order_status(&pool, &order.order_no, OrderStatus::Pending)
        .await
        .is_err());
    // paid orders can't be withdrawn by the customer
    assert!(cancel_order(&pool, user_id, &order.order_no).await.is_err());
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_single_item_checkout_is_pending() {
    let pool = get_test_pool().await;
    let email = format!("{}@storefront.ge", Uuid::new_v4().simple());
    let user_id = setup_user(&pool, &email, "tbilisi-2024").await.unwrap();
    let request = CheckoutRequest {
        items: Some(vec![line_item(1, 2500, 2)]),
        payment_method: PaymentMethod::Bog,
        delivery_method: None,
        address_id: None,
        shipping_address: Some(shipping_address()),
    };
    let order = create_order(&pool, user_id, &request).await.unwrap();
    assert_eq!(order.total_amount, 5000);
    assert_eq!(order.status, OrderStatus::Pending);

    let cancelled = cancel_order(&pool, user_id, &order.order_no).await.unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_taken_order_number_is_replaced() {
    let pool = get_test_pool().await;
    let email = format!("{}@storefront.ge", Uuid::new_v4().simple());
    let user_id = setup_user(&pool, &email, "tbilisi-2024").await.unwrap();
    let request = CheckoutRequest {
        items: Some(vec![line_item(1, 2500, 1)]),
        payment_method: PaymentMethod::BankTransfer,
        delivery_method: None,
        address_id: None,
        shipping_address: Some(shipping_address()),
    };
    let existing = create_order(&pool, user_id, &request).await.unwrap();

    let mut rng = StdRng::seed_from_u64(Uuid::new_v4().as_u128() as u64);
    let fresh = generate_order_no(&mut rng, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    let mut numbers = vec![fresh.clone(), existing.order_no.clone()];
    let order = create_order_with_numbers(&pool, user_id, &request, || {
        numbers.pop().unwrap_or_default()
    })
    .await
    .unwrap();
    assert_eq!(order.order_no, fresh);

    let result =
        create_order_with_numbers(&pool, user_id, &request, || existing.order_no.clone()).await;
    assert!(matches!(result, Err(OrderError::OrderNoTaken(_))));
}
