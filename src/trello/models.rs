//! Trello API request and response models.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

// ============================================================================
// Response types
// ============================================================================

/// Board summary from the organization boards listing (`fields=name`).
#[derive(Debug, Clone, Deserialize)]
pub struct BoardSummary {
    /// Board ID.
    pub id: String,
    /// Board name.
    pub name: String,
}

/// A list on a board.
#[derive(Debug, Clone, Deserialize)]
pub struct TrelloList {
    /// List ID.
    pub id: String,
    /// List name.
    pub name: String,
    /// Board-relative floating-point ordering key.
    pub pos: f64,
}

/// Id-only list projection (`fields=id`).
#[derive(Debug, Clone, Deserialize)]
pub struct ListRef {
    /// List ID.
    pub id: String,
}

/// Response body of a board creation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedBoard {
    /// ID of the new board.
    pub id: String,
}

/// Member reference (`fields=id`).
#[derive(Debug, Clone, Deserialize)]
pub struct MemberRef {
    /// Member ID.
    pub id: String,
}

/// Organization with nested member roster (`members=all&member_fields=id`).
#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationResponse {
    /// Organization ID.
    pub id: String,
    /// Member roster.
    #[serde(default)]
    pub members: Vec<MemberRef>,
}

/// Read-only organization snapshot, fetched once per run.
#[derive(Debug, Clone)]
pub struct Organization {
    /// Organization ID.
    pub id: String,
    /// IDs of every member, in listing order.
    pub member_ids: Vec<String>,
}

// ============================================================================
// Request types
// ============================================================================

/// Where to place a list on its destination board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ListPosition {
    /// Let Trello pick the minimum ordering key.
    Top,
    /// Pin an exact ordering key.
    At(f64),
}

impl Serialize for ListPosition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Top => serializer.serialize_str("top"),
            Self::At(pos) => serializer.serialize_f64(*pos),
        }
    }
}

impl fmt::Display for ListPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => write!(f, "top"),
            Self::At(pos) => write!(f, "{pos}"),
        }
    }
}

/// Request body for board creation.
#[derive(Debug, Serialize)]
pub struct CreateBoardRequest {
    /// Board name.
    pub name: String,
    /// Owning organization.
    #[serde(rename = "idOrganization")]
    pub id_organization: String,
    /// Visibility level for the new board.
    #[serde(rename = "prefs_permissionLevel")]
    pub prefs_permission_level: String,
    /// Board to copy from, if any.
    #[serde(rename = "idBoardSource", skip_serializing_if = "Option::is_none")]
    pub id_board_source: Option<String>,
    /// What to carry over from the source board.
    #[serde(rename = "keepFromSource", skip_serializing_if = "Option::is_none")]
    pub keep_from_source: Option<String>,
}

/// Request body for re-parenting a list (`PUT /1/lists/{id}/idBoard`).
#[derive(Debug, Serialize)]
pub struct MoveListRequest {
    /// Destination board ID.
    pub value: String,
    /// Position on the destination board.
    pub pos: ListPosition,
}

/// Request body for list creation.
#[derive(Debug, Serialize)]
pub struct CreateListRequest {
    /// List name.
    pub name: String,
    /// Board to create the list on.
    #[serde(rename = "idBoard")]
    pub id_board: String,
    /// Position on the board.
    pub pos: ListPosition,
}

/// Request body for the soft-delete (`PUT /1/lists/{id}/closed`).
#[derive(Debug, Serialize)]
pub struct CloseListRequest {
    /// `true` marks the list closed.
    pub value: bool,
}

/// Request body for a membership grant.
#[derive(Debug, Serialize)]
pub struct AddMemberRequest {
    /// Membership level; always `normal` (non-admin).
    #[serde(rename = "type")]
    pub member_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_position_serialization() {
        assert_eq!(
            serde_json::to_string(&ListPosition::Top).unwrap(),
            r#""top""#
        );
        assert_eq!(serde_json::to_string(&ListPosition::At(3.0)).unwrap(), "3.0");
    }

    #[test]
    fn test_list_deserialization_ignores_extra_fields() {
        let list: TrelloList = serde_json::from_str(
            r#"{"id": "l1", "name": "Done", "pos": 16384.5, "closed": false, "idBoard": "b1"}"#,
        )
        .unwrap();
        assert_eq!(list.id, "l1");
        assert_eq!(list.name, "Done");
        assert!((list.pos - 16384.5).abs() < f64::EPSILON);
    }
}
