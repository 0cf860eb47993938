//! `PostgreSQL` integration tests for mirrored users.

use mockable::DefaultClock;
use rstest::rstest;
use taskboard::user::{
    domain::{EmailAddress, User, UserId, UserProfile},
    ports::UserRepository,
};

use crate::postgres::helpers::{BoxError, context};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a PostgreSQL server in TASKBOARD_TEST_DATABASE_URL"]
async fn upsert_overwrites_profile_fields() -> Result<(), BoxError> {
    let context = context()?;
    let id = UserId::new("user_7")?;
    let first = UserProfile::new(
        id.clone(),
        EmailAddress::new("old@example.com")?,
        Some("Ada"),
        None,
    );
    let mut user = User::from_profile(first, &DefaultClock);
    context.users.upsert(&user).await?;

    let second = UserProfile::new(
        id.clone(),
        EmailAddress::new("ada@example.com")?,
        Some("Ada"),
        Some("Lovelace"),
    )
    .with_image_url("https://img.example.com/ada.png");
    user.apply_profile(second, &DefaultClock);
    context.users.upsert(&user).await?;

    let stored = context.users.find_by_id(&id).await?.ok_or("user should exist")?;
    assert_eq!(stored.name(), "Ada Lovelace");
    assert_eq!(stored.email().as_str(), "ada@example.com");
    assert_eq!(stored.image_url(), Some("https://img.example.com/ada.png"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a PostgreSQL server in TASKBOARD_TEST_DATABASE_URL"]
async fn email_lookup_skips_unknown_addresses() -> Result<(), BoxError> {
    let context = context()?;
    let profile = UserProfile::new(
        UserId::new("user_8")?,
        EmailAddress::new("grace@example.com")?,
        Some("Grace"),
        None,
    );
    context
        .users
        .upsert(&User::from_profile(profile, &DefaultClock))
        .await?;

    let found = context
        .users
        .find_by_emails(&[
            EmailAddress::new("grace@example.com")?,
            EmailAddress::new("nobody@example.com")?,
        ])
        .await?;

    assert_eq!(found.len(), 1);
    Ok(())
}
