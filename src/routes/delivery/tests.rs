use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::routes::delivery::errors::DeliveryTrackingError;
use crate::routes::delivery::models::DeliveryTrackingModel;
use crate::routes::delivery::schemas::DeliveryStatus;
use crate::routes::delivery::utils::{advance_delivery, normalize_weight, transportation_price};

fn tracking(status: DeliveryStatus) -> DeliveryTrackingModel {
    let ordered_at = Utc::now() - Duration::days(10);
    DeliveryTrackingModel {
        id: Uuid::new_v4(),
        order_id: Uuid::new_v4(),
        delivery_status: status,
        ordered_at,
        received_china_at: None,
        sent_tbilisi_at: None,
        delivered_tbilisi_at: None,
        weight_kg: None,
        transportation_price: None,
    }
}

#[test]
fn test_delivery_status_order() {
    assert_eq!(
        DeliveryStatus::Ordered.next(),
        Some(DeliveryStatus::ReceivedChina)
    );
    assert_eq!(
        DeliveryStatus::SentTbilisi.next(),
        Some(DeliveryStatus::DeliveredTbilisi)
    );
    assert_eq!(DeliveryStatus::DeliveredTbilisi.next(), None);
}

#[test]
fn test_advance_stamps_only_the_new_stage() {
    let received_at = Utc::now() - Duration::days(3);
    let mut current = tracking(DeliveryStatus::ReceivedChina);
    current.received_china_at = Some(received_at);
    let now = Utc::now();

    let advanced = advance_delivery(current, DeliveryStatus::SentTbilisi, now).unwrap();
    assert_eq!(advanced.delivery_status, DeliveryStatus::SentTbilisi);
    assert_eq!(advanced.sent_tbilisi_at, Some(now));
    assert_eq!(advanced.received_china_at, Some(received_at));
    assert_eq!(advanced.delivered_tbilisi_at, None);
}

#[test]
fn test_advance_rejects_skips_and_rewinds() {
    let skip = advance_delivery(
        tracking(DeliveryStatus::Ordered),
        DeliveryStatus::SentTbilisi,
        Utc::now(),
    );
    assert!(matches!(skip, Err(DeliveryTrackingError::InvalidStep { .. })));

    let rewind = advance_delivery(
        tracking(DeliveryStatus::SentTbilisi),
        DeliveryStatus::ReceivedChina,
        Utc::now(),
    );
    assert!(matches!(rewind, Err(DeliveryTrackingError::InvalidStep { .. })));

    let same = advance_delivery(
        tracking(DeliveryStatus::DeliveredTbilisi),
        DeliveryStatus::DeliveredTbilisi,
        Utc::now(),
    );
    assert!(same.is_err());
}

#[test]
fn test_transportation_price_rounds_up() {
    let weight = BigDecimal::from_str("2.5").unwrap();
    assert_eq!(transportation_price(&weight, 1500), Ok(3750));
    let weight = BigDecimal::from_str("1.001").unwrap();
    assert_eq!(transportation_price(&weight, 999), Ok(1000));
    let weight = BigDecimal::from_str("3").unwrap();
    assert_eq!(transportation_price(&weight, 700), Ok(2100));
}

#[test]
fn test_transportation_price_requires_weight() {
    assert!(transportation_price(&BigDecimal::from(0), 1500).is_err());
    assert!(transportation_price(&BigDecimal::from(-1), 1500).is_err());
}

#[test]
fn test_price_uses_stored_weight_precision() {
    let weight = BigDecimal::from_str("1.0001").unwrap();
    assert_eq!(
        normalize_weight(&weight),
        Ok(BigDecimal::from_str("1.000").unwrap())
    );
    assert_eq!(transportation_price(&weight, 1500), Ok(1500));

    let weight = BigDecimal::from_str("1.0005").unwrap();
    assert_eq!(
        normalize_weight(&weight),
        Ok(BigDecimal::from_str("1.001").unwrap())
    );
    // rounds to zero once stored
    assert!(normalize_weight(&BigDecimal::from_str("0.0004").unwrap()).is_err());
}

#[test]
fn test_weight_must_fit_column() {
    assert!(normalize_weight(&BigDecimal::from(100_000_000)).is_err());
    assert!(normalize_weight(&BigDecimal::from(10_000_000)).is_err());
    // 9999999.9996 rounds up to the bound
    assert!(normalize_weight(&BigDecimal::from_str("9999999.9996").unwrap()).is_err());
    assert!(normalize_weight(&BigDecimal::from_str("9999999.999").unwrap()).is_ok());
    assert!(transportation_price(&BigDecimal::from(100_000_000), 1500).is_err());
}
