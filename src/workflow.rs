//! The end-to-end sprint-close workflow.
//!
//! One invocation runs a fixed sequence against the Trello API: locate the
//! live sprint board and its `Done` list, create a dated archive board,
//! grant it the organization's membership, clear its auto-created default
//! lists, move `Done` onto it, and recreate an empty `Done` list where the
//! old one sat. The remote API offers no multi-step transactions, so the
//! sequence is strictly ordered and aborts on the first error with no
//! rollback.

use chrono::{Datelike, Days, NaiveDate, Utc, Weekday};
use tracing::{debug, info};

use crate::trello::{ListPosition, TrelloClient, TrelloError};

/// Name of the live sprint board.
pub const SPRINT_BOARD_NAME: &str = "Current Sprint";

/// Name of the list archived and recreated each cycle.
pub const DONE_LIST_NAME: &str = "Done";

/// Prefix of every archive board name.
const ARCHIVE_NAME_PREFIX: &str = "DevEx Sprint";

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct CloseReport {
    /// ID of the archive board created this run.
    pub archive_board_id: String,
    /// Name of the archive board.
    pub archive_board_name: String,
    /// How many members were granted access (the caller excluded).
    pub members_granted: usize,
}

/// Archive board name for the cycle containing `today`.
///
/// Names the current or upcoming Friday: running on a Friday names the
/// archive for that same day, any other day rolls forward to the next one.
#[must_use]
pub fn archive_board_name(today: NaiveDate) -> String {
    let days_until_friday = (7 + Weekday::Fri.num_days_from_monday()
        - today.weekday().num_days_from_monday())
        % 7;
    let friday = today + Days::new(u64::from(days_until_friday));

    format!("{ARCHIVE_NAME_PREFIX} {}", friday.format("%Y-%m-%d"))
}

/// Run the sprint-close sequence once.
///
/// Strictly sequential; the first error aborts the remaining steps. Already
/// completed steps are not rolled back.
///
/// # Errors
/// Returns the first `TrelloError` encountered at any step.
pub async fn close_sprint(client: &TrelloClient) -> Result<CloseReport, TrelloError> {
    let sprint_board_id = client.find_board(SPRINT_BOARD_NAME).await?;
    debug!(board_id = %sprint_board_id, "Current sprint board located");

    let done_list = client.find_list(DONE_LIST_NAME, &sprint_board_id).await?;
    debug!(list_id = %done_list.id, pos = done_list.pos, "Done list located");

    let org = client.organization().await?;
    debug!(
        org_id = %org.id,
        member_count = org.member_ids.len(),
        "Organization located"
    );

    let my_id = client.current_member_id().await?;
    debug!(user_id = %my_id, "Own member id located");

    let archive_board_name = archive_board_name(Utc::now().date_naive());
    let archive_board_id = client.create_board(&archive_board_name, None).await?;
    info!(
        board_id = %archive_board_id,
        board_name = %archive_board_name,
        "Created archive board"
    );

    let mut members_granted = 0;
    for member_id in &org.member_ids {
        if member_id == &my_id {
            continue;
        }
        debug!(member_id = %member_id, "Granting access");
        client.add_member(&archive_board_id, member_id).await?;
        members_granted += 1;
    }
    info!(member_count = members_granted, "Granted access to this organization");

    // A bare-created board comes with Trello's default lists; close them so
    // the archive holds nothing but the moved Done list.
    for list_id in client.list_ids(&archive_board_id).await? {
        debug!(list_id = %list_id, "Closing list");
        client.close_list(&list_id).await?;
    }
    info!("Closed pre-existing lists on the archive board");

    client
        .move_list(&done_list.id, &archive_board_id, ListPosition::Top)
        .await?;
    info!("Moved Done list to the archive board");

    client
        .create_list(
            DONE_LIST_NAME,
            &sprint_board_id,
            ListPosition::At(done_list.pos),
        )
        .await?;
    info!("Created Done list on the Current Sprint board");

    Ok(CloseReport {
        archive_board_id,
        archive_board_name,
        members_granted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Profile;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_archive_name_rolls_forward_to_friday() {
        // 2026-08-03 is a Monday; that week's Friday is 2026-08-07.
        let monday = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
        assert_eq!(archive_board_name(monday), "DevEx Sprint 2026-08-07");

        let thursday = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        assert_eq!(archive_board_name(thursday), "DevEx Sprint 2026-08-07");
    }

    #[test]
    fn test_archive_name_on_friday_stays_put() {
        let friday = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        assert_eq!(archive_board_name(friday), "DevEx Sprint 2026-08-07");
    }

    #[test]
    fn test_archive_name_weekend_targets_next_friday() {
        let saturday = NaiveDate::from_ymd_opt(2026, 8, 8).unwrap();
        assert_eq!(archive_board_name(saturday), "DevEx Sprint 2026-08-14");

        let sunday = NaiveDate::from_ymd_opt(2026, 8, 9).unwrap();
        assert_eq!(archive_board_name(sunday), "DevEx Sprint 2026-08-14");
    }

    #[test]
    fn test_archive_name_crosses_month_boundary() {
        // 2026-08-31 is a Monday; the next Friday is in September.
        let monday = NaiveDate::from_ymd_opt(2026, 8, 31).unwrap();
        assert_eq!(archive_board_name(monday), "DevEx Sprint 2026-09-04");
    }

    fn test_client(server: &MockServer) -> TrelloClient {
        let profile = Profile {
            key: "test-key".to_string(),
            token: "test-token".to_string(),
            organization: "devex".to_string(),
        };
        TrelloClient::with_base_url(profile, server.uri()).unwrap()
    }

    /// Mount the full happy-path API surface for one close run.
    async fn mount_happy_path(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/1/organizations/devex/boards"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "b-backlog", "name": "Backlog"},
                {"id": "b-sprint", "name": "Current Sprint"},
            ])))
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path("/1/boards/b-sprint/lists"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "l-doing", "name": "Doing", "pos": 1.0},
                {"id": "l-done", "name": "Done", "pos": 3.0},
            ])))
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path("/1/organizations/devex"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "o1",
                "members": [{"id": "m-me"}, {"id": "m-a"}, {"id": "m-b"}],
            })))
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path("/1/members/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "m-me"})))
            .mount(server)
            .await;

        Mock::given(method("POST"))
            .and(path("/1/boards"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "b-arch"})))
            .expect(1)
            .mount(server)
            .await;

        for member in ["m-a", "m-b"] {
            Mock::given(method("PUT"))
                .and(path(format!("/1/boards/b-arch/members/{member}")))
                .and(body_json(json!({"type": "normal"})))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "b-arch"})))
                .expect(1)
                .mount(server)
                .await;
        }

        // The caller never grants itself access.
        Mock::given(method("PUT"))
            .and(path("/1/boards/b-arch/members/m-me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "b-arch"})))
            .expect(0)
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path("/1/boards/b-arch/lists"))
            .and(query_param("fields", "id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "l-default-1"}, {"id": "l-default-2"},
            ])))
            .mount(server)
            .await;

        for list in ["l-default-1", "l-default-2"] {
            Mock::given(method("PUT"))
                .and(path(format!("/1/lists/{list}/closed")))
                .and(body_json(json!({"value": true})))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": list})))
                .expect(1)
                .mount(server)
                .await;
        }

        Mock::given(method("PUT"))
            .and(path("/1/lists/l-done/idBoard"))
            .and(body_json(json!({"value": "b-arch", "pos": "top"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "l-done"})))
            .expect(1)
            .mount(server)
            .await;

        Mock::given(method("POST"))
            .and(path("/1/lists"))
            .and(body_json(json!({"name": "Done", "idBoard": "b-sprint", "pos": 3.0})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "l-done-2"})))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_close_sprint_end_to_end() {
        let server = MockServer::start().await;
        mount_happy_path(&server).await;

        let client = test_client(&server);
        let report = close_sprint(&client).await.unwrap();

        assert_eq!(report.archive_board_id, "b-arch");
        assert_eq!(
            report.archive_board_name,
            archive_board_name(Utc::now().date_naive())
        );
        // Fan-out covered the roster minus the caller.
        assert_eq!(report.members_granted, 2);

        // Mock expectations (grant counts, close counts, the single move and
        // recreate) are verified when the server drops.
    }

    #[tokio::test]
    async fn test_close_sprint_aborts_on_first_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1/organizations/devex/boards"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "b-sprint", "name": "Current Sprint"},
            ])))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/1/boards/b-sprint/lists"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        // No step past the failure may fire.
        Mock::given(method("POST"))
            .and(path("/1/boards"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "b-arch"})))
            .expect(0)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = close_sprint(&client).await.unwrap_err();
        match err {
            TrelloError::Api { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_close_sprint_fails_when_board_missing() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1/organizations/devex/boards"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "b-backlog", "name": "Backlog"},
            ])))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = close_sprint(&client).await.unwrap_err();
        assert!(matches!(err, TrelloError::NotFound { kind: "board", .. }));
    }
}
