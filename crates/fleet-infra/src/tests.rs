//! Behavior tests: the core services wired to the in-memory adapters.

use std::sync::Arc;

use chrono::TimeDelta;
use uuid::Uuid;

use fleet_core::DomainError;
use fleet_core::domain::{Role, Vehicle};
use fleet_core::ports::{
    BaseRepository, BookingRepository, TokenService, UserRepository, VehicleRepository,
};
use fleet_core::service::{AuthService, BookingService, NewUser, Reconciler};

use crate::auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
use crate::clock::ManualClock;
use crate::memory::{
    InMemoryBookingRepository, InMemoryOtpRepository, InMemoryUserRepository,
    InMemoryVehicleRepository,
};
use crate::notify::CapturingOtpMailer;

struct Harness {
    users: Arc<InMemoryUserRepository>,
    otps: Arc<InMemoryOtpRepository>,
    vehicles: Arc<InMemoryVehicleRepository>,
    bookings: Arc<InMemoryBookingRepository>,
    mailer: Arc<CapturingOtpMailer>,
    clock: Arc<ManualClock>,
    tokens: Arc<JwtTokenService>,
    auth: AuthService,
    booking: BookingService,
    reconciler: Reconciler,
}

fn harness() -> Harness {
    let users = Arc::new(InMemoryUserRepository::new());
    let otps = Arc::new(InMemoryOtpRepository::new());
    let vehicles = Arc::new(InMemoryVehicleRepository::new());
    let bookings = Arc::new(InMemoryBookingRepository::new());
    let mailer = Arc::new(CapturingOtpMailer::new());
    let clock = Arc::new(ManualClock::starting_now());
    let tokens = Arc::new(JwtTokenService::new(JwtConfig {
        secret: "test-secret".to_string(),
        expiration_hours: 24,
        issuer: "test".to_string(),
    }));

    let auth = AuthService::new(
        users.clone(),
        otps.clone(),
        Arc::new(Argon2PasswordService::new()),
        tokens.clone(),
        mailer.clone(),
        clock.clone(),
    );
    let booking = BookingService::new(bookings.clone(), vehicles.clone(), clock.clone());
    let reconciler = Reconciler::new(
        otps.clone(),
        bookings.clone(),
        vehicles.clone(),
        clock.clone(),
    );

    Harness {
        users,
        otps,
        vehicles,
        bookings,
        mailer,
        clock,
        tokens,
        auth,
        booking,
        reconciler,
    }
}

fn new_user(email: &str, phone: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        password: "correct horse battery".to_string(),
        name: "A".to_string(),
        location: None,
        phone: phone.to_string(),
    }
}

async fn seed_vehicle(h: &Harness, price: f64) -> Vehicle {
    h.vehicles
        .save(Vehicle::new(
            "V".to_string(),
            "suv".to_string(),
            price,
            "https://store/v.jpg".to_string(),
            Uuid::new_v4(),
        ))
        .await
        .unwrap()
}

/// The biconditional at the heart of the lifecycle: a vehicle is
/// unavailable exactly when a pending booking references it.
async fn assert_availability_invariant(h: &Harness) {
    let bookings = h.bookings.list_all().await.unwrap();
    for vehicle in h.vehicles.list(&Default::default()).await.unwrap() {
        let pending = bookings
            .iter()
            .any(|b| b.vehicle_id == vehicle.id && !b.completed);
        assert_eq!(
            vehicle.available, !pending,
            "vehicle {} availability out of sync",
            vehicle.id
        );
    }
}

// --- Registration ---

#[tokio::test]
async fn register_succeeds_once_then_conflicts() {
    let h = harness();

    h.auth.register(new_user("a@x.com", "5550001")).await.unwrap();

    let err = h
        .auth
        .register(new_user("a@x.com", "5550002"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(f) if f == "email"));
}

#[tokio::test]
async fn register_rejects_duplicate_phone() {
    let h = harness();
    h.auth.register(new_user("a@x.com", "5550001")).await.unwrap();

    let err = h
        .auth
        .register(new_user("b@x.com", "5550001"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(f) if f == "phone"));
}

#[tokio::test]
async fn register_stores_only_a_hash() {
    let h = harness();
    h.auth.register(new_user("a@x.com", "5550001")).await.unwrap();

    let stored = h.users.find_by_email("a@x.com").await.unwrap().unwrap();
    assert_ne!(stored.password_hash, "correct horse battery");
    assert!(!stored.password_hash.contains("correct horse"));
}

// --- Login: password step ---

#[tokio::test]
async fn wrong_password_and_unknown_email_are_indistinguishable() {
    let h = harness();
    h.auth.register(new_user("a@x.com", "5550001")).await.unwrap();

    let wrong_password = h.auth.initiate_login("a@x.com", "nope").await.unwrap_err();
    let unknown_email = h
        .auth
        .initiate_login("ghost@x.com", "nope")
        .await
        .unwrap_err();

    assert!(matches!(wrong_password, DomainError::InvalidCredentials));
    assert!(matches!(unknown_email, DomainError::InvalidCredentials));
}

#[tokio::test]
async fn dispatch_failure_rolls_back_the_challenge() {
    let h = harness();
    h.auth.register(new_user("a@x.com", "5550001")).await.unwrap();

    h.mailer.fail_next();
    let err = h
        .auth
        .initiate_login("a@x.com", "correct horse battery")
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::NotificationFailed(_)));
    assert!(h.otps.is_empty().await, "no unusable live code may remain");
}

#[tokio::test]
async fn relogin_supersedes_the_prior_challenge() {
    let h = harness();
    h.auth.register(new_user("a@x.com", "5550001")).await.unwrap();

    h.auth
        .initiate_login("a@x.com", "correct horse battery")
        .await
        .unwrap();
    let first_code = h.mailer.last_code();

    h.auth
        .initiate_login("a@x.com", "correct horse battery")
        .await
        .unwrap();
    let second_code = h.mailer.last_code();

    assert_eq!(h.otps.len().await, 1);
    if first_code != second_code {
        let err = h.auth.complete_login("a@x.com", first_code).await.unwrap_err();
        assert!(matches!(err, DomainError::OtpMismatch));
    }
    h.auth.complete_login("a@x.com", second_code).await.unwrap();
}

// --- Login: OTP step ---

#[tokio::test]
async fn otp_is_single_use() {
    let h = harness();
    h.auth.register(new_user("a@x.com", "5550001")).await.unwrap();
    h.auth
        .initiate_login("a@x.com", "correct horse battery")
        .await
        .unwrap();
    let code = h.mailer.last_code();

    let token = h.auth.complete_login("a@x.com", code).await.unwrap();
    assert!(!token.is_empty());

    // Replay: the record is gone.
    let err = h.auth.complete_login("a@x.com", code).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}

#[tokio::test]
async fn expired_code_fails_even_when_correct() {
    let h = harness();
    h.auth.register(new_user("a@x.com", "5550001")).await.unwrap();
    h.auth
        .initiate_login("a@x.com", "correct horse battery")
        .await
        .unwrap();
    let code = h.mailer.last_code();

    h.clock.advance(TimeDelta::minutes(6));

    let err = h.auth.complete_login("a@x.com", code).await.unwrap_err();
    assert!(matches!(err, DomainError::OtpExpired));
}

#[tokio::test]
async fn mismatched_code_does_not_consume_the_challenge() {
    let h = harness();
    h.auth.register(new_user("a@x.com", "5550001")).await.unwrap();
    h.auth
        .initiate_login("a@x.com", "correct horse battery")
        .await
        .unwrap();
    let code = h.mailer.last_code();
    let wrong = if code == 999_999 { 100_000 } else { code + 1 };

    let err = h.auth.complete_login("a@x.com", wrong).await.unwrap_err();
    assert!(matches!(err, DomainError::OtpMismatch));

    // The real code still works.
    h.auth.complete_login("a@x.com", code).await.unwrap();
}

#[tokio::test]
async fn session_token_carries_identity_and_role() {
    let h = harness();
    let user = h.auth.register(new_user("a@x.com", "5550001")).await.unwrap();
    h.auth
        .initiate_login("a@x.com", "correct horse battery")
        .await
        .unwrap();

    let token = h
        .auth
        .complete_login("a@x.com", h.mailer.last_code())
        .await
        .unwrap();
    let claims = h.tokens.validate_token(&token).unwrap();

    assert_eq!(claims.user_id, user.id);
    assert_eq!(claims.role, Role::User);
    assert_eq!(claims.name, "A");
}

// --- Role toggle ---

#[tokio::test]
async fn toggle_role_requires_the_password_and_mints_a_fresh_token() {
    let h = harness();
    h.auth.register(new_user("a@x.com", "5550001")).await.unwrap();

    let err = h.auth.toggle_role("a@x.com", "stolen-token-no-password").await;
    assert!(matches!(err, Err(DomainError::InvalidCredentials)));

    let token = h
        .auth
        .toggle_role("a@x.com", "correct horse battery")
        .await
        .unwrap();
    assert_eq!(h.tokens.validate_token(&token).unwrap().role, Role::Host);

    let token = h
        .auth
        .toggle_role("a@x.com", "correct horse battery")
        .await
        .unwrap();
    assert_eq!(h.tokens.validate_token(&token).unwrap().role, Role::User);
}

#[tokio::test]
async fn admin_accounts_refuse_the_toggle() {
    let h = harness();
    let mut user = h.auth.register(new_user("a@x.com", "5550001")).await.unwrap();
    // Provisioning-time seed: admins are set directly in the store.
    user.role = Role::Admin;
    h.users.save(user).await.unwrap();

    let err = h
        .auth
        .toggle_role("a@x.com", "correct horse battery")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));
}

// --- Booking lifecycle ---

#[tokio::test]
async fn booking_an_unavailable_vehicle_fails_without_side_effects() {
    let h = harness();
    let vehicle = seed_vehicle(&h, 100.0).await;
    let renter = Uuid::new_v4();

    h.booking.create(vehicle.id, renter, 2).await.unwrap();

    let err = h
        .booking
        .create(vehicle.id, Uuid::new_v4(), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Unavailable(_)));
    assert_eq!(h.bookings.list_all().await.unwrap().len(), 1);
    assert_availability_invariant(&h).await;
}

#[tokio::test]
async fn booking_a_missing_vehicle_is_not_found() {
    let h = harness();
    let err = h
        .booking
        .create(Uuid::new_v4(), Uuid::new_v4(), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound("vehicle")));
}

#[tokio::test]
async fn book_then_cancel_restores_availability() {
    // Book for 2 days, then cancel.
    let h = harness();
    let user = h.auth.register(new_user("a@x.com", "5550001")).await.unwrap();
    let vehicle = seed_vehicle(&h, 100.0).await;

    let booking = h.booking.create(vehicle.id, user.id, 2).await.unwrap();
    assert!(!h.vehicles.find_by_id(vehicle.id).await.unwrap().unwrap().available);
    assert_availability_invariant(&h).await;

    h.booking.delete(booking.id, user.id).await.unwrap();
    assert!(h.vehicles.find_by_id(vehicle.id).await.unwrap().unwrap().available);
    assert_availability_invariant(&h).await;
}

#[tokio::test]
async fn only_the_owner_may_cancel() {
    let h = harness();
    let vehicle = seed_vehicle(&h, 100.0).await;
    let owner = Uuid::new_v4();

    let booking = h.booking.create(vehicle.id, owner, 2).await.unwrap();

    let err = h.booking.delete(booking.id, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));

    // Still held by the booking.
    assert!(!h.vehicles.find_by_id(vehicle.id).await.unwrap().unwrap().available);
}

#[tokio::test]
async fn update_recomputes_end_time_from_the_original_instant() {
    let h = harness();
    let vehicle = seed_vehicle(&h, 100.0).await;
    let owner = Uuid::new_v4();

    let booking = h.booking.create(vehicle.id, owner, 2).await.unwrap();
    let updated = h.booking.update(booking.id, owner, 7).await.unwrap();

    assert_eq!(updated.booked_at, booking.booked_at);
    assert_eq!(updated.end_time, booking.booked_at + TimeDelta::days(7));
    // Availability is untouched by a duration edit.
    assert!(!h.vehicles.find_by_id(vehicle.id).await.unwrap().unwrap().available);
    assert_availability_invariant(&h).await;
}

#[tokio::test]
async fn out_of_range_durations_are_rejected_before_the_hold() {
    let h = harness();
    let vehicle = seed_vehicle(&h, 100.0).await;
    let renter = Uuid::new_v4();

    for days in [0, -1, i64::MAX] {
        let err = h.booking.create(vehicle.id, renter, days).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidQuery(_)));
    }
    // Rejection happens before the hold; the vehicle must not be stranded.
    assert!(h.vehicles.find_by_id(vehicle.id).await.unwrap().unwrap().available);
    assert!(h.bookings.list_all().await.unwrap().is_empty());

    let booking = h.booking.create(vehicle.id, renter, 2).await.unwrap();
    let err = h.booking.update(booking.id, renter, i64::MAX).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidQuery(_)));
    let unchanged = h.bookings.find_by_id(booking.id).await.unwrap().unwrap();
    assert_eq!(unchanged.end_time, booking.end_time);
}

#[tokio::test]
async fn deleting_a_completed_booking_leaves_a_newer_hold_alone() {
    let h = harness();
    let vehicle = seed_vehicle(&h, 100.0).await;
    let first_renter = Uuid::new_v4();

    let old = h.booking.create(vehicle.id, first_renter, 1).await.unwrap();
    h.clock.advance(TimeDelta::days(2));
    h.reconciler.sweep_bookings().await.unwrap();

    // The sweep released the vehicle and a second renter took it.
    h.booking.create(vehicle.id, Uuid::new_v4(), 3).await.unwrap();

    h.booking.delete(old.id, first_renter).await.unwrap();

    assert!(!h.vehicles.find_by_id(vehicle.id).await.unwrap().unwrap().available);
    assert_availability_invariant(&h).await;
}

#[tokio::test]
async fn concurrent_creates_have_exactly_one_winner() {
    let h = harness();
    let vehicle = seed_vehicle(&h, 100.0).await;

    let (a, b) = tokio::join!(
        h.booking.create(vehicle.id, Uuid::new_v4(), 1),
        h.booking.create(vehicle.id, Uuid::new_v4(), 1),
    );

    let winners = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one create must win the hold");
    let loser = if a.is_err() { a } else { b };
    assert!(matches!(loser, Err(DomainError::Unavailable(_))));
    assert_eq!(h.bookings.list_all().await.unwrap().len(), 1);
    assert_availability_invariant(&h).await;
}

// --- Reconciliation ---

#[tokio::test]
async fn sweep_completes_overdue_bookings_and_releases_vehicles() {
    let h = harness();
    let vehicle = seed_vehicle(&h, 100.0).await;
    let renter = Uuid::new_v4();

    let booking = h.booking.create(vehicle.id, renter, 2).await.unwrap();
    h.clock.advance(TimeDelta::days(3));

    let report = h.reconciler.sweep_bookings().await.unwrap();
    assert_eq!(report.completed, 1);
    assert_eq!(report.failed, 0);

    let booking = h.bookings.find_by_id(booking.id).await.unwrap().unwrap();
    assert!(booking.completed, "auto-completion finalizes, not deletes");
    assert!(h.vehicles.find_by_id(vehicle.id).await.unwrap().unwrap().available);
    assert_availability_invariant(&h).await;
}

#[tokio::test]
async fn sweep_is_idempotent() {
    let h = harness();
    let vehicle = seed_vehicle(&h, 100.0).await;
    h.booking.create(vehicle.id, Uuid::new_v4(), 1).await.unwrap();
    h.clock.advance(TimeDelta::days(2));

    let first = h.reconciler.sweep_bookings().await.unwrap();
    let second = h.reconciler.sweep_bookings().await.unwrap();

    assert_eq!(first.completed, 1);
    assert_eq!(second.completed, 0);
    assert_eq!(second.failed, 0);
    assert_availability_invariant(&h).await;
}

#[tokio::test]
async fn sweep_leaves_active_bookings_alone() {
    let h = harness();
    let vehicle = seed_vehicle(&h, 100.0).await;
    h.booking.create(vehicle.id, Uuid::new_v4(), 30).await.unwrap();

    let report = h.reconciler.sweep_bookings().await.unwrap();
    assert_eq!(report.completed, 0);
    assert!(!h.vehicles.find_by_id(vehicle.id).await.unwrap().unwrap().available);
}

// --- Vehicle registry ---

mod vehicles {
    use super::*;
    use crate::storage::RecordingObjectStore;
    use fleet_core::service::{NewVehicle, VehicleService, VehicleUpdate};

    fn service() -> (VehicleService, Arc<RecordingObjectStore>) {
        let storage = Arc::new(RecordingObjectStore::new());
        let service = VehicleService::new(
            Arc::new(InMemoryVehicleRepository::new()),
            storage.clone(),
        );
        (service, storage)
    }

    fn listing(name: &str) -> NewVehicle {
        NewVehicle {
            name: name.to_string(),
            category: "suv".to_string(),
            price_per_day: 100.0,
            image_url: format!("https://store/{name}.jpg"),
        }
    }

    async fn drain_detached_tasks() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn delete_is_owner_gated_and_cascades_to_storage() {
        let (service, storage) = service();
        let host = Uuid::new_v4();
        let vehicle = service.add(host, listing("A")).await.unwrap();

        let err = service.delete(Uuid::new_v4(), vehicle.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden));

        service.delete(host, vehicle.id).await.unwrap();
        drain_detached_tasks().await;
        assert_eq!(storage.deleted_urls().await, vec!["https://store/A.jpg"]);
    }

    #[tokio::test]
    async fn storage_failure_never_blocks_record_deletion() {
        let (service, storage) = service();
        let host = Uuid::new_v4();
        let vehicle = service.add(host, listing("A")).await.unwrap();

        storage.fail_deletes(true);
        service.delete(host, vehicle.id).await.unwrap();
        drain_detached_tasks().await;

        let err = service.get(vehicle.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound("vehicle")));
        assert!(storage.deleted_urls().await.is_empty());
    }

    #[tokio::test]
    async fn replacing_an_image_removes_the_old_object() {
        let (service, storage) = service();
        let host = Uuid::new_v4();
        let vehicle = service.add(host, listing("A")).await.unwrap();

        let updated = service
            .update(
                host,
                vehicle.id,
                VehicleUpdate {
                    image_url: Some("https://store/new.jpg".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        drain_detached_tasks().await;

        assert_eq!(updated.image_url, "https://store/new.jpg");
        assert_eq!(storage.deleted_urls().await, vec!["https://store/A.jpg"]);
    }

    #[tokio::test]
    async fn listing_rejects_unknown_sort_fields() {
        use fleet_core::domain::SortField;
        assert!(matches!(
            SortField::parse("owner_password"),
            Err(DomainError::InvalidQuery(_))
        ));
    }
}

// --- Reviews ---

mod reviews {
    use super::*;
    use crate::memory::InMemoryReviewRepository;
    use fleet_core::service::{ReviewService, ReviewUpdate};

    async fn service_with_booking() -> (ReviewService, Uuid, Uuid, Uuid) {
        let bookings = Arc::new(InMemoryBookingRepository::new());
        let user_id = Uuid::new_v4();
        let vehicle_id = Uuid::new_v4();
        let booking = bookings
            .save(fleet_core::domain::Booking::new(
                vehicle_id,
                user_id,
                2,
                chrono::Utc::now(),
            ))
            .await
            .unwrap();

        let service = ReviewService::new(Arc::new(InMemoryReviewRepository::new()), bookings);
        (service, user_id, booking.id, vehicle_id)
    }

    #[tokio::test]
    async fn only_the_booking_holder_may_review() {
        let (service, user_id, booking_id, vehicle_id) = service_with_booking().await;

        let err = service
            .create(Uuid::new_v4(), booking_id, vehicle_id, 5, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden));

        let review = service
            .create(user_id, booking_id, vehicle_id, 4, Some("solid".to_string()))
            .await
            .unwrap();
        assert_eq!(review.rating, 4);

        let listed = service.list_for_vehicle(vehicle_id).await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn out_of_range_rating_is_rejected() {
        let (service, user_id, booking_id, vehicle_id) = service_with_booking().await;

        let err = service
            .create(user_id, booking_id, vehicle_id, 6, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidQuery(_)));
    }

    #[tokio::test]
    async fn admins_may_delete_any_review_authors_only_their_own() {
        let (service, user_id, booking_id, vehicle_id) = service_with_booking().await;
        let review = service
            .create(user_id, booking_id, vehicle_id, 3, None)
            .await
            .unwrap();

        let err = service
            .delete(Uuid::new_v4(), Role::User, review.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden));

        service
            .delete(Uuid::new_v4(), Role::Admin, review.id)
            .await
            .unwrap();
        assert!(service.list_for_vehicle(vehicle_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_is_owner_gated() {
        let (service, user_id, booking_id, vehicle_id) = service_with_booking().await;
        let review = service
            .create(user_id, booking_id, vehicle_id, 3, None)
            .await
            .unwrap();

        let err = service
            .update(
                Uuid::new_v4(),
                review.id,
                ReviewUpdate {
                    rating: Some(1),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden));

        let updated = service
            .update(
                user_id,
                review.id,
                ReviewUpdate {
                    rating: Some(5),
                    comment: Some("better".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.rating, 5);
        assert_eq!(updated.comment, "better");
    }
}

#[tokio::test]
async fn otp_sweep_removes_only_expired_challenges() {
    let h = harness();
    h.auth.register(new_user("a@x.com", "5550001")).await.unwrap();
    h.auth.register(new_user("b@x.com", "5550002")).await.unwrap();

    h.auth
        .initiate_login("a@x.com", "correct horse battery")
        .await
        .unwrap();
    h.clock.advance(TimeDelta::minutes(6));
    h.auth
        .initiate_login("b@x.com", "correct horse battery")
        .await
        .unwrap();

    assert_eq!(h.reconciler.sweep_otps().await.unwrap(), 1);
    assert_eq!(h.otps.len().await, 1);
    // Idempotent.
    assert_eq!(h.reconciler.sweep_otps().await.unwrap(), 0);
}
