use crate::routes::admin::models::OrderStatusSummaryModel;
use crate::routes::admin::schemas::OrderStatusCount;
use crate::routes::admin::utils::summarize_orders;
use crate::routes::order::schemas::OrderStatus;

fn summary(status: OrderStatus, count: i64, total_amount: i64) -> OrderStatusSummaryModel {
    OrderStatusSummaryModel {
        status,
        count,
        total_amount,
    }
}

#[test]
fn test_revenue_counts_paid_orders_only() {
    let rows = vec![
        summary(OrderStatus::Pending, 3, 15000),
        summary(OrderStatus::Paid, 2, 5000),
        summary(OrderStatus::Shipped, 1, 2500),
        summary(OrderStatus::Delivered, 4, 10000),
        summary(OrderStatus::Cancelled, 1, 900),
    ];
    let (counts, revenue) = summarize_orders(&rows).unwrap();
    assert_eq!(revenue, 17500);
    assert_eq!(counts.len(), OrderStatus::ALL.len());
    assert!(counts.contains(&OrderStatusCount {
        status: OrderStatus::Processing,
        count: 0,
    }));
    assert!(counts.contains(&OrderStatusCount {
        status: OrderStatus::Pending,
        count: 3,
    }));
}

#[test]
fn test_empty_store_has_no_revenue() {
    let (counts, revenue) = summarize_orders(&[]).unwrap();
    assert_eq!(revenue, 0);
    assert!(counts.iter().all(|row| row.count == 0));
}
