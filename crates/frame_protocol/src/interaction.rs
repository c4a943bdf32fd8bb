//! Inbound frame interactions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CardKind, ProtocolResult, Transition};

/// Body posted by a feed client when a button is pressed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameRequest {
    /// Client-reported fields. Informational only; never trusted.
    #[serde(default)]
    pub untrusted_data: UntrustedData,
    /// Signed message the verifier checks.
    #[serde(default)]
    pub trusted_data: TrustedData,
}

/// Client-reported interaction fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UntrustedData {
    #[serde(default)]
    pub fid: Option<u64>,
    #[serde(default)]
    pub button_index: Option<u8>,
    #[serde(default)]
    pub input_text: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

/// Signed interaction message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustedData {
    /// Hex-encoded signed message bytes.
    #[serde(default)]
    pub message_bytes: String,
}

/// An interaction whose signature has been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameMessage {
    /// Acting user.
    pub fid: u64,
    /// 1-based index of the pressed button.
    pub button_index: Option<u8>,
    /// Text typed into the card's input.
    pub input_text: Option<String>,
    /// Serialized state echoed from the previous card.
    pub state: Option<String>,
}

/// State a card hands to the client to echo back on the next press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameState {
    /// Card the user was looking at.
    pub card: CardKind,
    /// Todo the complete button acts on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_todo: Option<Uuid>,
}

impl FrameState {
    /// State of a card with nothing selected.
    pub fn on(card: CardKind) -> Self {
        Self {
            card,
            selected_todo: None,
        }
    }

    /// Decodes an echoed state. Absent or empty state decodes to `None`.
    pub fn decode(serialized: Option<&str>) -> ProtocolResult<Option<Self>> {
        match serialized.map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
        }
    }
}

/// What a verified message asks the server to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// No button pressed yet.
    Entry,
    /// Submit the input as a new todo. The input may still be blank.
    SubmitTodo { input: String },
    /// Show the entry card.
    Compose,
    /// Show the open todos.
    ShowList,
    /// Complete the selected todo, if any.
    CompleteSelected { todo_id: Option<Uuid> },
    /// The pressed button is not on the echoed card.
    Unrecognized { button_index: u8 },
}

impl Interaction {
    /// Returns true for the entry interaction, which never touches the store.
    pub fn is_entry(&self) -> bool {
        matches!(self, Self::Entry)
    }
}

impl FrameMessage {
    /// Resolves the pressed button against the card the user was looking at.
    ///
    /// Without an echoed state the user is on the launch frame.
    pub fn interaction(&self) -> ProtocolResult<Interaction> {
        let index = match self.button_index {
            None | Some(0) => return Ok(Interaction::Entry),
            Some(index) => index,
        };

        let state = FrameState::decode(self.state.as_deref())?;
        let card = state.map_or(CardKind::Launch, |s| s.card);

        let Some(action) = card.action_at(index) else {
            return Ok(Interaction::Unrecognized {
                button_index: index,
            });
        };

        Ok(match action.transition() {
            Transition::SubmitTodo => Interaction::SubmitTodo {
                input: self.input_text.clone().unwrap_or_default(),
            },
            Transition::Compose => Interaction::Compose,
            Transition::ShowList => Interaction::ShowList,
            Transition::CompleteSelected => Interaction::CompleteSelected {
                todo_id: state.and_then(|s| s.selected_todo),
            },
        })
    }
}
