use ledger_webhook_engine::{events::EventProducers, traits::EventManagement, EventApi};

mod support;

#[tokio::test]
async fn appends_preserve_order_and_content() {
    let db = support::prepare_test_store().await;
    let api = EventApi::new(db, EventProducers::default());

    api.record_event(r#"{"eventNotifications":[{"realmId":"company1"}]}"#).await.unwrap();
    api.record_event("").await.unwrap();
    api.record_event("not json at all").await.unwrap();

    let events = api.all_events().await.unwrap();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].payload, r#"{"eventNotifications":[{"realmId":"company1"}]}"#);
    // The empty payload is a valid entry, not a skipped one.
    assert_eq!(events[1].payload, "");
    assert_eq!(events[2].payload, "not json at all");
    assert!(events[0].id < events[1].id && events[1].id < events[2].id);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_appends_lose_nothing() {
    const WRITERS: usize = 5;
    const EVENTS_PER_WRITER: usize = 10;

    let db = support::prepare_test_store().await;

    let mut handles = Vec::with_capacity(WRITERS);
    for w in 0..WRITERS {
        let db = db.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..EVENTS_PER_WRITER {
                db.insert_event(&format!("writer {w} delivery {i}")).await.unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let api = EventApi::new(db, EventProducers::default());
    assert_eq!(api.count().await.unwrap(), (WRITERS * EVENTS_PER_WRITER) as i64);

    let events = api.all_events().await.unwrap();
    assert_eq!(events.len(), WRITERS * EVENTS_PER_WRITER);
    // No duplicates, no losses, and ids reflect append order.
    for pair in events.windows(2) {
        assert!(pair[0].id < pair[1].id);
    }
    for w in 0..WRITERS {
        for i in 0..EVENTS_PER_WRITER {
            let expected = format!("writer {w} delivery {i}");
            assert_eq!(events.iter().filter(|e| e.payload == expected).count(), 1);
        }
    }
}
