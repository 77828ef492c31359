use super::*;

#[tokio::test]
async fn test_delivering_frees_table_once() {
    let fx = fixture();
    let t1 = fx.add_table(1).await;
    let order = fx
        .engine
        .create_order(dine_in(&t1.id, vec![item("Pizza", 2, "85.0"), item("Cola", 1, "15.0")]))
        .await
        .unwrap();
    assert_eq!(order.total_amount, dec("185.0"));
    assert!(fx.table(&t1.id).await.is_occupied);

    let delivered = fx.engine.set_status(&order.id, OrderStatus::Delivered).await.unwrap();
    assert_eq!(delivered.status, OrderStatus::Delivered);
    assert!(!fx.table(&t1.id).await.is_occupied);

    // Table reused by walk-in; a retried call must not touch it
    fx.tables.set_occupied(&t1.id, true).await.unwrap();
    let again = fx.engine.set_status(&order.id, OrderStatus::Delivered).await.unwrap();
    assert_eq!(again.updated_at, delivered.updated_at);
    assert!(fx.table(&t1.id).await.is_occupied);
}

#[tokio::test]
async fn test_forward_steps_and_skips() {
    let fx = fixture();
    let order = fx
        .engine
        .create_order(order_input(OrderType::Takeaway, vec![item("Tea", 1, "2.00")]))
        .await
        .unwrap();

    let o = fx.engine.set_status(&order.id, OrderStatus::Preparing).await.unwrap();
    assert_eq!(o.status, OrderStatus::Preparing);
    let o = fx.engine.set_status(&order.id, OrderStatus::Delivered).await.unwrap();
    assert_eq!(o.status, OrderStatus::Delivered);
}

#[tokio::test]
async fn test_backward_and_terminal_moves_rejected() {
    let fx = fixture();
    let order = fx
        .engine
        .create_order(order_input(OrderType::Takeaway, vec![item("Tea", 1, "2.00")]))
        .await
        .unwrap();

    fx.engine.set_status(&order.id, OrderStatus::Ready).await.unwrap();
    let err = fx
        .engine
        .set_status(&order.id, OrderStatus::Pending)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OrderError::InvalidTransition {
            from: OrderStatus::Ready,
            to: OrderStatus::Pending
        }
    ));

    fx.engine.set_status(&order.id, OrderStatus::Cancelled).await.unwrap();
    let err = fx
        .engine
        .set_status(&order.id, OrderStatus::Delivered)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::InvalidTransition { .. }));
    assert_eq!(fx.order(&order.id).await.status, OrderStatus::Cancelled);
}

#[tokio::test]
async fn test_unknown_order() {
    let fx = fixture();
    let err = fx
        .engine
        .set_status("nope", OrderStatus::Ready)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::OrderNotFound(_)));
}

#[tokio::test]
async fn test_shared_table_stays_occupied_until_last_order_closes() {
    let fx = fixture();
    let t1 = fx.add_table(1).await;
    let first = fx
        .engine
        .create_order(dine_in(&t1.id, vec![item("Soup", 1, "5.00")]))
        .await
        .unwrap();
    let second = fx
        .engine
        .create_order(dine_in(&t1.id, vec![item("Bread", 1, "2.00")]))
        .await
        .unwrap();

    fx.engine.set_status(&first.id, OrderStatus::Delivered).await.unwrap();
    assert!(fx.table(&t1.id).await.is_occupied);

    fx.engine.set_status(&second.id, OrderStatus::Cancelled).await.unwrap();
    assert!(!fx.table(&t1.id).await.is_occupied);
}

#[tokio::test]
async fn test_repeated_cancel_does_not_release_courier_twice() {
    let fx = fixture();
    let courier = fx.add_courier("Ana").await;

    let mut data = delivery(vec![item("Curry", 1, "11.00")]);
    data.courier_id = Some(courier.id.clone());
    let first = fx.engine.create_order(data).await.unwrap();

    fx.engine.set_status(&first.id, OrderStatus::Cancelled).await.unwrap();
    assert!(fx.courier(&courier.id).await.is_available);

    // Courier moves on to another order
    let second = fx
        .engine
        .create_order(delivery(vec![item("Rice", 1, "3.00")]))
        .await
        .unwrap();
    fx.engine.assign_courier(&second.id, &courier.id).await.unwrap();
    assert!(!fx.courier(&courier.id).await.is_available);

    // Retried cancel of the first order leaves the courier busy
    fx.engine.set_status(&first.id, OrderStatus::Cancelled).await.unwrap();
    assert!(!fx.courier(&courier.id).await.is_available);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_terminal_updates_settle_once() {
    let fx = fixture();
    let t1 = fx.add_table(1).await;
    let order = fx
        .engine
        .create_order(dine_in(&t1.id, vec![item("Fish", 1, "14.00")]))
        .await
        .unwrap();

    let handles = (0..8).map(|_| {
        let engine = fx.engine.clone();
        let id = order.id.clone();
        tokio::spawn(async move { engine.set_status(&id, OrderStatus::Delivered).await })
    });

    let mut stamps = Vec::new();
    for joined in futures::future::join_all(handles).await {
        let result = joined.unwrap().unwrap();
        assert_eq!(result.status, OrderStatus::Delivered);
        stamps.push(result.updated_at);
    }
    stamps.dedup();
    assert_eq!(stamps.len(), 1);
    assert!(!fx.table(&t1.id).await.is_occupied);
}

#[tokio::test]
async fn test_purge_deletes_and_releases() {
    let fx = fixture();
    let t1 = fx.add_table(1).await;
    let courier = fx.add_courier("Ana").await;

    let open = fx
        .engine
        .create_order(dine_in(&t1.id, vec![item("Soup", 1, "5.00")]))
        .await
        .unwrap();
    let mut data = delivery(vec![item("Pie", 1, "6.00")]);
    data.courier_id = Some(courier.id.clone());
    let assigned = fx.engine.create_order(data).await.unwrap();
    let done = fx
        .engine
        .create_order(order_input(OrderType::Takeaway, vec![item("Tea", 1, "2.00")]))
        .await
        .unwrap();
    let done = fx.engine.set_status(&done.id, OrderStatus::Delivered).await.unwrap();

    let deleted = fx
        .engine
        .purge(&[open.clone(), assigned.clone(), done])
        .await
        .unwrap();

    assert_eq!(deleted, 3);
    assert_eq!(fx.order_count().await, 0);
    assert!(!fx.table(&t1.id).await.is_occupied);
    assert!(fx.courier(&courier.id).await.is_available);
}
