use std::path::PathBuf;
use std::sync::Arc;

use ulid::Ulid;

use hotdesk::auth::SessionCache;
use hotdesk::directory::{Coworking, InMemoryDirectory};
use hotdesk::engine::{Engine, EngineError};
use hotdesk::model::{BookingStatus, MS_PER_HOUR, Ms, Tariff, Workplace};
use hotdesk::wire::BookingDto;

const H: Ms = MS_PER_HOUR;

fn now_ms() -> Ms {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as Ms
}

fn test_wal_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("hotdesk_test_flow");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    let _ = std::fs::remove_file(&path);
    path
}

fn seed_directory() -> (Arc<InMemoryDirectory>, Ulid, Ulid, Ulid) {
    let directory = Arc::new(InMemoryDirectory::new());
    let coworking = Ulid::new();
    directory.add_coworking(Coworking {
        id: coworking,
        name: "Main".into(),
        address: "1 High St".into(),
    });
    let vip = Workplace {
        id: Ulid::new(),
        coworking_id: coworking,
        name: "Desk 1".into(),
        tariff: Tariff {
            id: Ulid::new(),
            name: "VIP".into(),
            price_per_hour: 750,
        },
    };
    let std_desk = Workplace {
        id: Ulid::new(),
        coworking_id: coworking,
        name: "Desk 2".into(),
        tariff: Tariff {
            id: Ulid::new(),
            name: "Standard".into(),
            price_per_hour: 300,
        },
    };
    let (w_vip, w_std) = (vip.id, std_desk.id);
    directory.add_workplace(vip);
    directory.add_workplace(std_desk);
    (directory, coworking, w_vip, w_std)
}

#[tokio::test]
async fn full_booking_lifecycle() {
    let (directory, coworking, w_vip, w_std) = seed_directory();
    let wal_path = test_wal_path("lifecycle.wal");
    let engine = Arc::new(Engine::new(wal_path.clone(), directory.clone()).unwrap());

    // Authenticate two callers through the session cache.
    let sessions = SessionCache::new();
    sessions.insert("alice-token".into(), 1, false, now_ms() + H);
    sessions.insert("admin-token".into(), 1000, true, now_ms() + H);
    let alice = sessions.authenticate("alice-token").unwrap();
    let admin = sessions.authenticate("admin-token").unwrap();
    assert!(sessions.authenticate("bogus").is_err());

    // Alice books both desks for 90 minutes tomorrow.
    let t = now_ms() + 24 * H;
    let booking = engine
        .create_booking(alice.user_id, vec![w_vip, w_std], t, t + 90 * 60_000)
        .await
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Waiting);
    assert_eq!(booking.total_price, 1575.0); // 1.5 h × (750 + 300)

    // A second user cannot take an overlapping slot on either desk.
    let denied = engine
        .create_booking(2, vec![w_std], t + 30 * 60_000, t + 2 * H)
        .await;
    assert_eq!(
        denied,
        Err(EngineError::AccessDenied("Workplace is already booked"))
    );

    // Listings: owner view, coworking view, admin view.
    let own = engine
        .list_user_bookings(alice.user_id, false, alice.is_admin)
        .await
        .unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(
        engine.list_user_bookings(alice.user_id, true, false).await,
        Err(EngineError::AccessDenied("Access denied"))
    );
    let by_location = engine.list_coworking_bookings(coworking).await.unwrap();
    assert_eq!(by_location.len(), 1);
    let all = engine.list_all_bookings(admin.is_admin).await.unwrap();
    assert_eq!(all.len(), 1);

    // Reschedule while WAITING, then check repricing.
    let updated = engine
        .update_booking(booking.id, alice.user_id, None, Some(t + 2 * H))
        .await
        .unwrap();
    assert_eq!(updated.total_price, 2100.0); // 2 h × (750 + 300)

    // Wire shape for the request layer.
    let dto = BookingDto::from(&updated);
    let json = serde_json::to_value(&dto).unwrap();
    assert_eq!(json["status"], "WAITING");
    assert_eq!(json["workplaces"].as_array().unwrap().len(), 2);
    assert!(json["start_time"].as_str().unwrap().contains('T'));

    // Restart: the WAL replays the updated state.
    drop(engine);
    let engine = Engine::new(wal_path, directory).unwrap();
    let restored = engine.get_booking(updated.id).await.unwrap();
    assert_eq!(restored.span, updated.span);
    assert_eq!(restored.total_price, 2100.0);

    // Delete and verify the slot frees up.
    engine
        .delete_booking(restored.id, alice.user_id)
        .await
        .unwrap();
    assert_eq!(
        engine.get_booking(restored.id).await,
        Err(EngineError::NotFound("Booking"))
    );
    engine
        .create_booking(2, vec![w_vip], t, t + H)
        .await
        .unwrap();
}

#[tokio::test]
async fn pending_feed_drives_bot_notifications() {
    let (directory, _, w_vip, _) = seed_directory();
    let engine = Arc::new(Engine::new(test_wal_path("pending_feed.wal"), directory).unwrap());

    // Whole seconds: the wire format renders second precision.
    let t = (now_ms() / 1000) * 1000 + 24 * H;
    let booking = engine.create_booking(7, vec![w_vip], t, t + H).await.unwrap();

    let pending = engine.pending_bookings().await.unwrap();
    assert_eq!(pending.len(), 1);

    // The bot consumes id, user_id and start_time from the wire shape.
    let dto = BookingDto::from(&pending[0]);
    assert_eq!(dto.id, booking.id.to_string());
    assert_eq!(dto.user_id, 7);
    assert_eq!(hotdesk::wire::iso_to_ms(&dto.start_time), Some(t));
}
