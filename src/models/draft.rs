//! Draft models

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{null_as_default, require_non_empty, Payload};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub draft_id: String,
    #[serde(default)]
    pub league_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "type", default)]
    pub draft_type: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub start_time: Option<i64>,
    /// User id -> draft slot
    #[serde(default, deserialize_with = "null_as_default")]
    pub draft_order: HashMap<String, u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub settings: HashMap<String, serde_json::Value>,
}

impl Payload for Draft {
    fn validate(&self) -> Result<(), String> {
        require_non_empty("draft_id", &self.draft_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftPick {
    pub round: u32,
    pub pick_no: u32,
    pub player_id: String,
    #[serde(default)]
    pub roster_id: Option<u32>,
    #[serde(default)]
    pub picked_by: Option<String>,
    #[serde(default)]
    pub draft_slot: Option<u32>,
    #[serde(default)]
    pub is_keeper: Option<bool>,
}

impl Payload for DraftPick {
    fn validate(&self) -> Result<(), String> {
        if self.round == 0 || self.pick_no == 0 {
            return Err(format!(
                "pick {}.{} is not a valid draft position",
                self.round, self.pick_no
            ));
        }
        require_non_empty("player_id", &self.player_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_decodes() {
        let draft: Draft = serde_json::from_str(
            r#"{"draft_id":"d1","type":"snake","status":"complete","draft_order":{"u1":1},"settings":null}"#,
        )
        .unwrap();
        assert_eq!(draft.draft_type.as_deref(), Some("snake"));
        assert_eq!(draft.draft_order["u1"], 1);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_pick_validation() {
        let pick: DraftPick =
            serde_json::from_str(r#"{"round":1,"pick_no":3,"player_id":"4046","roster_id":2}"#).unwrap();
        assert!(pick.validate().is_ok());

        let bad: DraftPick =
            serde_json::from_str(r#"{"round":0,"pick_no":3,"player_id":"4046"}"#).unwrap();
        assert!(bad.validate().is_err());
    }
}
