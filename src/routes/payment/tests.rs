use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::payment_client::{
    GatewayOrder, GatewayOrderRequest, GatewayPaymentStatus, PaymentGateway,
};
use crate::routes::order::models::OrderModel;
use crate::routes::order::schemas::{
    CheckoutRequest, OrderLineItem, OrderStatus, PaymentMethod, ShippingAddress,
};
use crate::routes::order::utils::{create_order, fetch_order_by_no, transition_order_status};
use crate::routes::payment::errors::PaymentError;
use crate::routes::payment::schemas::{BankTransferRequest, BogCallback};
use crate::routes::payment::utils::{
    fetch_payments, initiate_bog_payment, process_bog_callback, submit_bank_transfer,
    validate_order_for_payment,
};
use crate::routes::user::tests::setup_user;
use crate::tests::tests::get_test_pool;

/// Gateway double that hands out a new order id per call and reports
/// whatever status the test sets.
#[derive(Debug)]
struct StubGateway {
    created: AtomicUsize,
    status: Mutex<GatewayPaymentStatus>,
}

impl StubGateway {
    fn new(status: GatewayPaymentStatus) -> Self {
        Self {
            created: AtomicUsize::new(0),
            status: Mutex::new(status),
        }
    }

    fn set_status(&self, status: GatewayPaymentStatus) {
        *self.status.lock().unwrap() = status;
    }
}

#[async_trait]
impl PaymentGateway for StubGateway {
    async fn create_order(
        &self,
        request: &GatewayOrderRequest<'_>,
    ) -> Result<GatewayOrder, anyhow::Error> {
        let attempt = self.created.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(GatewayOrder {
            gateway_order_id: format!("bog-{}-{}", request.external_order_id, attempt),
            redirect_url: "https://payment.bog.ge/?order_id=1".to_string(),
        })
    }

    async fn fetch_order_status(
        &self,
        _gateway_order_id: &str,
    ) -> Result<GatewayPaymentStatus, anyhow::Error> {
        Ok(*self.status.lock().unwrap())
    }
}

fn callback_json(external_order_id: &str, order_id: &str, key: &str) -> serde_json::Value {
    serde_json::json!({
        "event": "order_payment",
        "zoned_request_time": "2024-06-01T10:00:00.000000Z",
        "body": {
            "order_id": order_id,
            "external_order_id": external_order_id,
            "order_status": {"key": key, "value": "status"},
        }
    })
}

fn order_model(status: OrderStatus, method: PaymentMethod, user_id: Uuid) -> OrderModel {
    OrderModel {
        id: Uuid::new_v4(),
        order_no: "ORD-20240601-ABC234".to_string(),
        user_id,
        items: sqlx::types::Json(vec![]),
        total_amount: 5000,
        status,
        payment_method: method,
        delivery_method: None,
        recipient_name: "Nino Beridze".to_string(),
        mobile_no: "599123456".to_string(),
        city: "Tbilisi".to_string(),
        street_address: "12 Rustaveli Ave".to_string(),
        postal_code: None,
        external_order_id: None,
        gateway_order_id: None,
        created_on: Utc::now(),
        updated_on: None,
    }
}

#[test]
fn test_callback_reported_status() {
    let reported = |key| {
        serde_json::from_value::<BogCallback>(callback_json("ORD-1", "bog-1", key))
            .unwrap()
            .reported_status()
    };
    assert_eq!(reported("completed"), GatewayPaymentStatus::Completed);
    assert_eq!(reported("rejected"), GatewayPaymentStatus::Rejected);
    assert_eq!(reported("in_progress"), GatewayPaymentStatus::InProgress);
}

#[test]
fn test_validate_order_for_payment() {
    let user_id = Uuid::new_v4();
    let order = order_model(OrderStatus::Pending, PaymentMethod::Bog, user_id);
    assert!(validate_order_for_payment(&order, user_id, PaymentMethod::Bog).is_ok());
    assert!(matches!(
        validate_order_for_payment(&order, Uuid::new_v4(), PaymentMethod::Bog),
        Err(PaymentError::OrderNotFound(_))
    ));
    assert!(matches!(
        validate_order_for_payment(&order, user_id, PaymentMethod::BankTransfer),
        Err(PaymentError::ValidationError(_))
    ));
    let order = order_model(OrderStatus::Paid, PaymentMethod::Bog, user_id);
    assert!(matches!(
        validate_order_for_payment(&order, user_id, PaymentMethod::Bog),
        Err(PaymentError::InvalidOrderState(_))
    ));
}

#[test]
fn test_bank_transfer_requires_details() {
    let request = BankTransferRequest {
        order_no: "ORD-20240601-ABC234".to_string(),
        transaction_id: "TBC-778812".to_string(),
        payer_name: " ".to_string(),
        bank_name: "TBC Bank".to_string(),
    };
    assert_eq!(request.validate(), Err("payerName is required".to_string()));
}

async fn place_order(
    pool: &sqlx::PgPool,
    user_id: Uuid,
    payment_method: PaymentMethod,
) -> String {
    let request = CheckoutRequest {
        items: Some(vec![OrderLineItem {
            product_id: 1,
            name: "Phone".to_string(),
            price: 2500,
            quantity: 2,
            image: None,
        }]),
        payment_method,
        delivery_method: None,
        address_id: None,
        shipping_address: Some(ShippingAddress {
            recipient_name: "Nino Beridze".to_string(),
            mobile_no: "599123456".to_string(),
            city: "Tbilisi".to_string(),
            street_address: "12 Rustaveli Ave".to_string(),
            postal_code: None,
        }),
    };
    create_order(pool, user_id, &request).await.unwrap().order_no
}

async fn deliver_callback(
    pool: &sqlx::PgPool,
    gateway: &StubGateway,
    order_no: &str,
    gateway_order_id: &str,
    key: &str,
) -> Result<OrderStatus, PaymentError> {
    let payload = callback_json(order_no, gateway_order_id, key);
    let callback: BogCallback = serde_json::from_value(payload.clone()).unwrap();
    process_bog_callback(pool, gateway, &callback, &payload)
        .await
        .map(|result| result.status)
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_repeated_bog_callback_is_idempotent() {
    let pool = get_test_pool().await;
    let email = format!("{}@storefront.ge", Uuid::new_v4().simple());
    let user_id = setup_user(&pool, &email, "tbilisi-2024").await.unwrap();
    let order_no = place_order(&pool, user_id, PaymentMethod::Bog).await;
    let gateway = StubGateway::new(GatewayPaymentStatus::Completed);

    let initiation = initiate_bog_payment(&pool, &gateway, user_id, &order_no)
        .await
        .unwrap();
    assert_eq!(initiation.gateway_order_id, format!("bog-{}-1", order_no));

    assert!(matches!(
        deliver_callback(&pool, &gateway, &order_no, "bog-other", "completed").await,
        Err(PaymentError::ValidationError(_))
    ));

    for _ in 0..2 {
        let status = deliver_callback(
            &pool,
            &gateway,
            &order_no,
            &initiation.gateway_order_id,
            "completed",
        )
        .await
        .unwrap();
        assert_eq!(status, OrderStatus::Paid);
    }
    let order = fetch_order_by_no(&pool, &order_no).await.unwrap().unwrap();
    let payments = fetch_payments(&pool, order.id).await.unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].status, OrderStatus::Paid);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_completed_callback_is_confirmed_with_gateway() {
    let pool = get_test_pool().await;
    let email = format!("{}@storefront.ge", Uuid::new_v4().simple());
    let user_id = setup_user(&pool, &email, "tbilisi-2024").await.unwrap();
    let order_no = place_order(&pool, user_id, PaymentMethod::Bog).await;
    let gateway = StubGateway::new(GatewayPaymentStatus::Rejected);
    let initiation = initiate_bog_payment(&pool, &gateway, user_id, &order_no)
        .await
        .unwrap();

    // the notification claims success while BOG has the payment rejected
    let status = deliver_callback(
        &pool,
        &gateway,
        &order_no,
        &initiation.gateway_order_id,
        "completed",
    )
    .await
    .unwrap();
    assert_eq!(status, OrderStatus::Pending);
    let order = fetch_order_by_no(&pool, &order_no).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    let payments = fetch_payments(&pool, order.id).await.unwrap();
    assert!(payments.iter().all(|p| p.status != OrderStatus::Paid));
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_payment_retry_after_rejection_settles_new_payment() {
    let pool = get_test_pool().await;
    let email = format!("{}@storefront.ge", Uuid::new_v4().simple());
    let user_id = setup_user(&pool, &email, "tbilisi-2024").await.unwrap();
    let order_no = place_order(&pool, user_id, PaymentMethod::Bog).await;
    let gateway = StubGateway::new(GatewayPaymentStatus::Rejected);

    let first = initiate_bog_payment(&pool, &gateway, user_id, &order_no)
        .await
        .unwrap();
    let status = deliver_callback(&pool, &gateway, &order_no, &first.gateway_order_id, "rejected")
        .await
        .unwrap();
    assert_eq!(status, OrderStatus::Pending);

    let second = initiate_bog_payment(&pool, &gateway, user_id, &order_no)
        .await
        .unwrap();
    assert_ne!(first.gateway_order_id, second.gateway_order_id);
    // notifications for the abandoned attempt no longer match the order
    assert!(matches!(
        deliver_callback(&pool, &gateway, &order_no, &first.gateway_order_id, "completed").await,
        Err(PaymentError::ValidationError(_))
    ));

    gateway.set_status(GatewayPaymentStatus::Completed);
    let status = deliver_callback(
        &pool,
        &gateway,
        &order_no,
        &second.gateway_order_id,
        "completed",
    )
    .await
    .unwrap();
    assert_eq!(status, OrderStatus::Paid);

    let order = fetch_order_by_no(&pool, &order_no).await.unwrap().unwrap();
    let statuses: Vec<OrderStatus> = fetch_payments(&pool, order.id)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.status)
        .collect();
    assert_eq!(statuses, vec![OrderStatus::Cancelled, OrderStatus::Paid]);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_order_without_pending_payment_cannot_be_paid() {
    let pool = get_test_pool().await;
    let email = format!("{}@storefront.ge", Uuid::new_v4().simple());
    let user_id = setup_user(&pool, &email, "tbilisi-2024").await.unwrap();
    let order_no = place_order(&pool, user_id, PaymentMethod::Bog).await;
    let gateway = StubGateway::new(GatewayPaymentStatus::Rejected);
    let initiation = initiate_bog_payment(&pool, &gateway, user_id, &order_no)
        .await
        .unwrap();
    deliver_callback(&pool, &gateway, &order_no, &initiation.gateway_order_id, "rejected")
        .await
        .unwrap();

    assert!(transition_order_status(&pool, &order_no, OrderStatus::Paid)
        .await
        .is_err());
    let order = fetch_order_by_no(&pool, &order_no).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_bank_transfer_moves_order_to_processing() {
    let pool = get_test_pool().await;
    let email = format!("{}@storefront.ge", Uuid::new_v4().simple());
    let user_id = setup_user(&pool, &email, "tbilisi-2024").await.unwrap();
    let order_no = place_order(&pool, user_id, PaymentMethod::BankTransfer).await;
    let request = BankTransferRequest {
        order_no: order_no.clone(),
        transaction_id: "TBC-778812".to_string(),
        payer_name: "Nino Beridze".to_string(),
        bank_name: "TBC Bank".to_string(),
    };
    let payment = submit_bank_transfer(&pool, user_id, &request).await.unwrap();
    assert_eq!(payment.transaction_id.as_deref(), Some("TBC-778812"));
    let order = fetch_order_by_no(&pool, &order_no).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Processing);
    // a second submission finds the order already processing
    assert!(matches!(
        submit_bank_transfer(&pool, user_id, &request).await,
        Err(PaymentError::InvalidOrderState(_))
    ));
}
