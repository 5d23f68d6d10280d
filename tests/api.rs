//! REST surface: signup/login, tour CRUD, ownership and visibility rules.

mod common;

use common::{spawn_app, step};
use reqwest::StatusCode;
use tourcraft::client::{ClientError, TourApi};

#[tokio::test]
async fn signup_then_login_round_trip() {
    let (base, _ws) = spawn_app().await;

    let mut api = TourApi::new(base.clone());
    let created = api
        .signup("Ada", "ada@example.com", "correct-horse")
        .await
        .expect("signup should succeed");
    assert!(!created.token.is_empty());
    assert_eq!(created.user.email, "ada@example.com");

    // Duplicate email is rejected.
    let mut dup = TourApi::new(base.clone());
    let err = dup.signup("Ada Again", "ada@example.com", "whatever").await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status, .. } if status == StatusCode::BAD_REQUEST));

    // Wrong password is a 401, right one returns a fresh credential.
    let mut login = TourApi::new(base);
    let err = login.login("ada@example.com", "wrong").await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status, .. } if status == StatusCode::UNAUTHORIZED));

    let auth = login.login("ada@example.com", "correct-horse").await.expect("login should succeed");
    assert_eq!(auth.user.id, created.user.id);
}

#[tokio::test]
async fn create_requires_title_and_steps() {
    let (base, _ws) = spawn_app().await;

    let mut api = TourApi::new(base);
    api.signup("Ada", "ada@example.com", "correct-horse").await.unwrap();

    let err = api.create_tour("No steps", &[], false).await.unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(message, "Please provide title and steps");
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = api
        .create_tour("", &[step("data:image/png;base64,AAAA", "first")], false)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Api { status, .. } if status == StatusCode::BAD_REQUEST));
}

#[tokio::test]
async fn private_tours_are_invisible_to_other_users() {
    let (base, _ws) = spawn_app().await;

    let mut owner = TourApi::new(base.clone());
    owner.signup("Ada", "ada@example.com", "correct-horse").await.unwrap();
    let tour = owner
        .create_tour("Private", &[step("data:image/png;base64,AAAA", "first")], false)
        .await
        .unwrap();

    let mut other = TourApi::new(base);
    other.signup("Eve", "eve@example.com", "also-strong").await.unwrap();

    // Fetch, update and delete all collapse into the same 404: existence
    // of someone else's private tour is not observable.
    let err = other.fetch_tour(tour.id).await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status, .. } if status == StatusCode::NOT_FOUND));

    let err = other
        .update_tour(tour.id, Some("hijacked".to_owned()), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Api { status, .. } if status == StatusCode::NOT_FOUND));

    let err = other.delete_tour(tour.id).await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status, .. } if status == StatusCode::NOT_FOUND));

    // The owner is unaffected.
    let fetched = owner.fetch_tour(tour.id).await.unwrap();
    assert_eq!(fetched.title, "Private");
}

#[tokio::test]
async fn public_tours_are_readable_without_credentials() {
    let (base, _ws) = spawn_app().await;

    let mut owner = TourApi::new(base.clone());
    owner.signup("Ada", "ada@example.com", "correct-horse").await.unwrap();
    let tour = owner
        .create_tour("Shared", &[step("data:video/webm;base64,AAAA", "recording")], true)
        .await
        .unwrap();

    let anonymous = TourApi::new(base);
    let fetched = anonymous.fetch_tour(tour.id).await.expect("public preview should load");
    assert_eq!(fetched.title, "Shared");
    assert_eq!(fetched.owner_id, tour.owner_id);

    // Listing stays private.
    let err = anonymous.list_tours().await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status, .. } if status == StatusCode::UNAUTHORIZED));
}

#[tokio::test]
async fn malformed_tour_id_is_a_bad_request() {
    let (base, _ws) = spawn_app().await;

    let response = reqwest::get(format!("{base}/api/tours/definitely-not-a-uuid"))
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_is_partial_and_delete_removes() {
    let (base, _ws) = spawn_app().await;

    let mut api = TourApi::new(base);
    api.signup("Ada", "ada@example.com", "correct-horse").await.unwrap();

    let steps = vec![
        step("data:image/png;base64,AAAA", "open settings"),
        step("data:image/png;base64,BBBB", "click save"),
    ];
    let tour = api.create_tour("Walkthrough", &steps, false).await.unwrap();

    // Title-only update leaves the step sequence alone.
    let updated = api
        .update_tour(tour.id, Some("Walkthrough v2".to_owned()), None, None)
        .await
        .unwrap();
    assert_eq!(updated.title, "Walkthrough v2");
    assert_eq!(updated.steps, steps);
    assert_eq!(updated.owner_id, tour.owner_id);

    // Steps update replaces the sequence wholesale, including emptying it.
    let updated = api.update_tour(tour.id, None, Some(vec![]), None).await.unwrap();
    assert!(updated.steps.is_empty());
    assert_eq!(updated.title, "Walkthrough v2");

    api.delete_tour(tour.id).await.expect("delete should succeed");
    let err = api.fetch_tour(tour.id).await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status, .. } if status == StatusCode::NOT_FOUND));
    assert!(api.list_tours().await.unwrap().is_empty());
}
