//! Domain tests for team names and membership.

use crate::team::domain::{Team, TeamDomainError, TeamName};
use crate::test_support::{FixedClock, day};
use crate::user::domain::UserId;
use rstest::rstest;

fn user(id: &str) -> UserId {
    UserId::new(id).expect("valid user id")
}

#[rstest]
#[case("")]
#[case("  \t ")]
fn team_name_rejects_blank(#[case] raw: &str) {
    assert_eq!(TeamName::new(raw), Err(TeamDomainError::EmptyTeamName));
}

#[rstest]
fn team_name_rejects_overlong_values() {
    let raw = "x".repeat(101);
    assert_eq!(
        TeamName::new(raw.clone()),
        Err(TeamDomainError::TeamNameTooLong(raw))
    );
}

#[rstest]
fn team_name_is_trimmed() {
    let name = TeamName::new("  Platform ").expect("valid name");
    assert_eq!(name.as_str(), "Platform");
}

#[rstest]
fn add_members_counts_only_new_users() {
    let clock = FixedClock::at(day(0));
    let name = TeamName::new("Platform").expect("valid name");
    let mut team = Team::new(name, [user("ada")], &clock);

    clock.advance(chrono::Duration::days(1));
    let added = team.add_members([user("ada"), user("grace")], &clock);

    assert_eq!(added, 1);
    assert!(team.has_member(&user("grace")));
    assert_eq!(team.updated_at(), day(1));
}

#[rstest]
fn adding_existing_members_keeps_timestamp() {
    let clock = FixedClock::at(day(0));
    let name = TeamName::new("Platform").expect("valid name");
    let mut team = Team::new(name, [user("ada")], &clock);

    clock.advance(chrono::Duration::days(1));
    assert_eq!(team.add_members([user("ada")], &clock), 0);
    assert_eq!(team.updated_at(), day(0));
}

#[rstest]
fn archive_is_idempotent() {
    let clock = FixedClock::at(day(0));
    let name = TeamName::new("Platform").expect("valid name");
    let mut team = Team::new(name, [user("ada")], &clock);

    clock.advance(chrono::Duration::days(1));
    team.archive(&clock);
    clock.advance(chrono::Duration::days(1));
    team.archive(&clock);

    assert!(team.is_archived());
    assert_eq!(team.updated_at(), day(1));
}

#[rstest]
fn blank_description_is_dropped() {
    let clock = FixedClock::at(day(0));
    let name = TeamName::new("Platform").expect("valid name");
    let team = Team::new(name, [], &clock).with_description("   ");
    assert_eq!(team.description(), None);
}
