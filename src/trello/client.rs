//! Trello REST API client implementation.
//!
//! API Documentation: <https://developer.atlassian.com/cloud/trello/rest/>

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::error::TrelloError;
use super::models::{
    AddMemberRequest, BoardSummary, CloseListRequest, CreateBoardRequest, CreateListRequest,
    CreatedBoard, ListPosition, ListRef, MemberRef, MoveListRequest, Organization,
    OrganizationResponse, TrelloList,
};
use crate::profile::Profile;

/// Base URL for the Trello API.
const API_BASE_URL: &str = "https://api.trello.com";

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Authenticated Trello API client, scoped to one organization.
#[derive(Debug, Clone)]
pub struct TrelloClient {
    /// HTTP client.
    client: Client,
    /// API base URL.
    base_url: String,
    /// Credentials and organization scope.
    profile: Profile,
}

impl TrelloClient {
    /// Create a new client against the production API.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(profile: Profile) -> Result<Self, TrelloError> {
        Self::with_base_url(profile, API_BASE_URL)
    }

    /// Create a new client against a specific base URL.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn with_base_url(
        profile: Profile,
        base_url: impl Into<String>,
    ) -> Result<Self, TrelloError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            profile,
        })
    }

    /// Make an authenticated GET request.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, TrelloError> {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "GET request");

        let response = self
            .client
            .get(&url)
            .query(&self.auth_params())
            .query(query)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Make an authenticated POST request with a JSON body.
    async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, TrelloError>
    where
        T: DeserializeOwned,
        B: serde::Serialize,
    {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "POST request");

        let response = self
            .client
            .post(&url)
            .query(&self.auth_params())
            .json(body)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Make an authenticated POST request, discarding the response body.
    async fn post_empty<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), TrelloError> {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "POST request (empty response)");

        let response = self
            .client
            .post(&url)
            .query(&self.auth_params())
            .json(body)
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// Make an authenticated PUT request, discarding the response body.
    async fn put_empty<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), TrelloError> {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "PUT request (empty response)");

        let response = self
            .client
            .put(&url)
            .query(&self.auth_params())
            .json(body)
            .send()
            .await?;

        Self::check_status(response).await
    }

    fn auth_params(&self) -> [(&'static str, &str); 2] {
        [("key", &self.profile.key), ("token", &self.profile.token)]
    }

    /// Handle API response, parsing JSON or error.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, TrelloError> {
        let status = response.status();
        let text = response.text().await?;

        if matches!(status.as_u16(), 200 | 201) {
            serde_json::from_str(&text).map_err(|e| {
                warn!(error = %e, body = %text, "Failed to parse response");
                TrelloError::Decode(e)
            })
        } else {
            Err(TrelloError::Api {
                status: status.as_u16(),
                body: text,
            })
        }
    }

    /// Check a write response for success, ignoring its body.
    async fn check_status(response: reqwest::Response) -> Result<(), TrelloError> {
        let status = response.status();
        if matches!(status.as_u16(), 200 | 201) {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(TrelloError::Api {
                status: status.as_u16(),
                body,
            })
        }
    }

    /// Discover the ID of an existing board by exact, case-sensitive name.
    ///
    /// Returns the first match in the order the API delivers the listing.
    ///
    /// # Errors
    /// Returns `NotFound` if no board matches, or the transport/decode error.
    pub async fn find_board(&self, name: &str) -> Result<String, TrelloError> {
        let path = format!("/1/organizations/{}/boards", self.profile.organization);
        let boards: Vec<BoardSummary> = self.get(&path, &[("fields", "name")]).await?;

        for board in &boards {
            debug!(name = %board.name, id = %board.id, "Board");
            if board.name == name {
                return Ok(board.id.clone());
            }
        }

        Err(TrelloError::NotFound {
            kind: "board",
            name: name.to_string(),
        })
    }

    /// Create a new board under the configured organization.
    ///
    /// With `source_board_id`, Trello copies that board's memberships onto
    /// the new board. Returns the new board's ID from the creation response.
    ///
    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded.
    pub async fn create_board(
        &self,
        name: &str,
        source_board_id: Option<&str>,
    ) -> Result<String, TrelloError> {
        let request = CreateBoardRequest {
            name: name.to_string(),
            id_organization: self.profile.organization.clone(),
            prefs_permission_level: "org".to_string(),
            id_board_source: source_board_id.map(ToString::to_string),
            keep_from_source: source_board_id.map(|_| "memberships".to_string()),
        };

        let created: CreatedBoard = self.post("/1/boards", &request).await?;
        Ok(created.id)
    }

    /// Locate a list on a board by exact, case-sensitive name.
    ///
    /// # Errors
    /// Returns `NotFound` if no list matches, or the transport/decode error.
    pub async fn find_list(&self, name: &str, board_id: &str) -> Result<TrelloList, TrelloError> {
        let path = format!("/1/boards/{board_id}/lists");
        let lists: Vec<TrelloList> = self.get(&path, &[]).await?;

        for list in lists {
            debug!(name = %list.name, id = %list.id, pos = list.pos, "List");
            if list.name == name {
                return Ok(list);
            }
        }

        Err(TrelloError::NotFound {
            kind: "list",
            name: name.to_string(),
        })
    }

    /// Return the ID of every list currently on a board.
    ///
    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded.
    pub async fn list_ids(&self, board_id: &str) -> Result<Vec<String>, TrelloError> {
        let path = format!("/1/boards/{board_id}/lists");
        let lists: Vec<ListRef> = self.get(&path, &[("fields", "id")]).await?;
        Ok(lists.into_iter().map(|l| l.id).collect())
    }

    /// Soft-delete a list. Trello marks it closed rather than removing it,
    /// and closing an already-closed list succeeds.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn close_list(&self, list_id: &str) -> Result<(), TrelloError> {
        let path = format!("/1/lists/{list_id}/closed");
        self.put_empty(&path, &CloseListRequest { value: true }).await
    }

    /// Re-parent a list to a different board at the given position.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn move_list(
        &self,
        list_id: &str,
        board_id: &str,
        pos: ListPosition,
    ) -> Result<(), TrelloError> {
        let path = format!("/1/lists/{list_id}/idBoard");
        self.put_empty(
            &path,
            &MoveListRequest {
                value: board_id.to_string(),
                pos,
            },
        )
        .await
    }

    /// Create a new list on a board at the given position.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn create_list(
        &self,
        name: &str,
        board_id: &str,
        pos: ListPosition,
    ) -> Result<(), TrelloError> {
        self.post_empty(
            "/1/lists",
            &CreateListRequest {
                name: name.to_string(),
                id_board: board_id.to_string(),
                pos,
            },
        )
        .await
    }

    /// Grant a member normal (non-admin) access to a board. Granting to an
    /// existing member is a no-op on the Trello side.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn add_member(&self, board_id: &str, member_id: &str) -> Result<(), TrelloError> {
        let path = format!("/1/boards/{board_id}/members/{member_id}");
        self.put_empty(
            &path,
            &AddMemberRequest {
                member_type: "normal".to_string(),
            },
        )
        .await
    }

    /// Resolve the caller's own member ID.
    ///
    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded.
    pub async fn current_member_id(&self) -> Result<String, TrelloError> {
        let me: MemberRef = self.get("/1/members/me", &[("fields", "id")]).await?;
        Ok(me.id)
    }

    /// Fetch the configured organization's ID and full member roster.
    ///
    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded.
    pub async fn organization(&self) -> Result<Organization, TrelloError> {
        let path = format!("/1/organizations/{}", self.profile.organization);
        let org: OrganizationResponse = self
            .get(
                &path,
                &[
                    ("fields", "id"),
                    ("members", "all"),
                    ("member_fields", "id"),
                ],
            )
            .await?;

        Ok(Organization {
            id: org.id,
            member_ids: org.members.into_iter().map(|m| m.id).collect(),
        })
    }
}
