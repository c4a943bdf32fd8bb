//! Card documents and the buttons they carry.

use entities::Todo;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use crate::{FrameLinks, FrameState, FRAME_VERSION};

/// Where pressing a button leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Submit the text input as a new todo.
    SubmitTodo,
    /// Show the entry card with its text input.
    Compose,
    /// Show the open todos.
    ShowList,
    /// Complete the todo selected in the echoed state.
    CompleteSelected,
}

/// Every button a card can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonAction {
    AddTodo,
    TryAgain,
    Another,
    New,
    MyList,
    Refresh,
    Complete,
    Streak,
}

impl ButtonAction {
    /// Returns the transition this button leads to.
    pub fn transition(self) -> Transition {
        match self {
            Self::AddTodo | Self::TryAgain => Transition::SubmitTodo,
            Self::Another | Self::New | Self::Streak => Transition::Compose,
            Self::MyList | Self::Refresh => Transition::ShowList,
            Self::Complete => Transition::CompleteSelected,
        }
    }

    /// Returns the fixed label of this button.
    ///
    /// The streak button's label depends on the streak; see [`Button::streak`].
    pub fn label(self) -> &'static str {
        match self {
            Self::AddTodo => "+ New Todo",
            Self::TryAgain => "+ Try Again",
            Self::Another => "+ Another",
            Self::New => "+ New",
            Self::MyList => "📋 My List",
            Self::Refresh => "🔄 Refresh",
            Self::Complete => "✅ Complete",
            Self::Streak => "🏆 Streak",
        }
    }
}

/// The kinds of card the server renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    /// Initial frame embedded in the launch page.
    Launch,
    /// Prompt for a new todo.
    Entry,
    /// Re-prompt after blank input.
    EmptyInput,
    /// Confirmation after a todo was added.
    Added,
    /// Open todos.
    List,
    /// Confirmation after a completion.
    Completed,
}

impl CardKind {
    /// Returns the buttons of this card in on-screen order.
    pub fn actions(self) -> &'static [ButtonAction] {
        use ButtonAction::*;
        match self {
            Self::Launch => &[AddTodo],
            Self::Entry => &[AddTodo, MyList],
            Self::EmptyInput => &[TryAgain, MyList],
            Self::Added => &[Another, MyList],
            Self::List => &[Complete, New, Refresh],
            Self::Completed => &[MyList, New, Streak],
        }
    }

    /// Returns the button at a 1-based index, as reported by feed clients.
    pub fn action_at(self, index: u8) -> Option<ButtonAction> {
        let position = usize::from(index).checked_sub(1)?;
        self.actions().get(position).copied()
    }

    /// Returns the text-input prompt of this card, if it has one.
    pub fn input_prompt(self) -> Option<&'static str> {
        match self {
            Self::Launch => Some("Add a todo..."),
            Self::Entry => Some("What needs to be done?"),
            Self::EmptyInput => Some("Todo text required!"),
            Self::Added | Self::List | Self::Completed => None,
        }
    }
}

/// A button as rendered on a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    /// What the button does. Not sent to the client.
    #[serde(skip)]
    pub action: ButtonAction,
    /// On-screen label.
    pub label: String,
}

impl Button {
    /// Creates a button with its fixed label.
    pub fn new(action: ButtonAction) -> Self {
        Self {
            action,
            label: action.label().to_string(),
        }
    }

    /// Creates the streak button.
    pub fn streak(streak: i64) -> Self {
        Self {
            action: ButtonAction::Streak,
            label: format!("🏆 {} Day Streak", streak),
        }
    }
}

/// Text-input prompt of a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInput {
    pub text: String,
}

/// A todo embedded in the list card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardItem {
    pub id: Uuid,
    pub text: String,
    pub priority: i32,
}

impl From<&Todo> for CardItem {
    fn from(todo: &Todo) -> Self {
        Self {
            id: todo.id,
            text: todo.text.clone(),
            priority: todo.priority,
        }
    }
}

/// The document describing the next UI state.
#[derive(Debug, Clone, Serialize)]
pub struct Card {
    /// Which card this is. Not sent to the client.
    #[serde(skip)]
    pub kind: CardKind,
    /// Protocol version tag.
    pub version: &'static str,
    /// Background image URL.
    pub image: String,
    /// Buttons in on-screen order.
    pub buttons: Vec<Button>,
    /// Optional text input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<CardInput>,
    /// State the client echoes back on the next press.
    #[serde(serialize_with = "serialize_state")]
    pub state: FrameState,
    /// Todos shown on the list card.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<CardItem>,
}

impl Card {
    fn build(kind: CardKind, image: String, buttons: Vec<Button>) -> Self {
        Self {
            kind,
            version: FRAME_VERSION,
            image,
            buttons,
            input: kind.input_prompt().map(|text| CardInput {
                text: text.to_string(),
            }),
            state: FrameState::on(kind),
            items: Vec::new(),
        }
    }

    fn with_fixed_buttons(kind: CardKind, image: String) -> Self {
        let buttons = kind.actions().iter().copied().map(Button::new).collect();
        Self::build(kind, image, buttons)
    }

    /// Entry card, also the fallback for unrecognized presses.
    pub fn entry(links: &FrameLinks, fid: u64) -> Self {
        Self::with_fixed_buttons(CardKind::Entry, links.image_url(fid, &[]))
    }

    /// Re-prompt after a blank submission.
    pub fn empty_input(links: &FrameLinks, fid: u64) -> Self {
        Self::with_fixed_buttons(
            CardKind::EmptyInput,
            links.image_url(fid, &[("error", "empty".to_string())]),
        )
    }

    /// Confirmation after a todo was added.
    pub fn added(links: &FrameLinks, fid: u64) -> Self {
        Self::with_fixed_buttons(
            CardKind::Added,
            links.image_url(fid, &[("added", "true".to_string())]),
        )
    }

    /// Open todos, newest first. The newest one is selected for completion.
    pub fn list(links: &FrameLinks, fid: u64, todos: &[Todo]) -> Self {
        let mut card = Self::with_fixed_buttons(
            CardKind::List,
            links.image_url(fid, &[("list", "true".to_string())]),
        );
        card.items = todos.iter().map(CardItem::from).collect();
        card.state.selected_todo = todos.first().map(|todo| todo.id);
        card
    }

    /// Confirmation after a completion, reporting the current streak.
    pub fn completed(links: &FrameLinks, fid: u64, streak: i64) -> Self {
        let image = links.image_url(
            fid,
            &[
                ("completed", "true".to_string()),
                ("streak", streak.to_string()),
            ],
        );
        let buttons = vec![
            Button::new(ButtonAction::MyList),
            Button::new(ButtonAction::New),
            Button::streak(streak),
        ];
        Self::build(CardKind::Completed, image, buttons)
    }

    /// Returns the button labels in on-screen order.
    pub fn labels(&self) -> Vec<&str> {
        self.buttons.iter().map(|b| b.label.as_str()).collect()
    }
}

fn serialize_state<S: Serializer>(state: &FrameState, serializer: S) -> Result<S::Ok, S::Error> {
    let encoded = serde_json::to_string(state).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&encoded)
}

/// Response body of the frame endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct FrameResponse {
    pub frames: Vec<Card>,
}

impl From<Card> for FrameResponse {
    fn from(card: Card) -> Self {
        Self { frames: vec![card] }
    }
}

#[cfg(test)]
mod tests {
    use entities::NewTodo;

    use super::*;

    fn links() -> FrameLinks {
        FrameLinks::new("https://todo.example").unwrap()
    }

    #[test]
    fn test_entry_card() {
        let card = Card::entry(&links(), 99);
        assert_eq!(card.labels(), vec!["+ New Todo", "📋 My List"]);
        assert_eq!(card.input.unwrap().text, "What needs to be done?");
        assert_eq!(card.image, "https://todo.example/api/images/frame?fid=99");
        assert_eq!(card.version, "vNext");
    }

    #[test]
    fn test_empty_input_card() {
        let card = Card::empty_input(&links(), 99);
        assert_eq!(card.labels(), vec!["+ Try Again", "📋 My List"]);
        assert_eq!(card.input.unwrap().text, "Todo text required!");
        assert!(card.image.ends_with("fid=99&error=empty"));
    }

    #[test]
    fn test_added_card_has_no_input() {
        let card = Card::added(&links(), 5);
        assert_eq!(card.labels(), vec!["+ Another", "📋 My List"]);
        assert!(card.input.is_none());
        assert!(card.image.ends_with("fid=5&added=true"));
    }

    #[test]
    fn test_list_card_selects_newest() {
        let first = Todo::from_new(NewTodo::from_input(5, "newest").unwrap());
        let second = Todo::from_new(NewTodo::from_input(5, "older").unwrap());
        let card = Card::list(&links(), 5, &[first.clone(), second]);

        assert_eq!(card.labels(), vec!["✅ Complete", "+ New", "🔄 Refresh"]);
        assert_eq!(card.items.len(), 2);
        assert_eq!(card.items[0].text, "newest");
        assert_eq!(card.state.selected_todo, Some(first.id));
    }

    #[test]
    fn test_empty_list_card_selects_nothing() {
        let card = Card::list(&links(), 5, &[]);
        assert!(card.items.is_empty());
        assert!(card.state.selected_todo.is_none());

        let json = serde_json::to_value(&card).unwrap();
        assert!(json.get("items").is_none());
    }

    #[test]
    fn test_completed_card_reports_streak() {
        let card = Card::completed(&links(), 5, 3);
        assert_eq!(card.labels(), vec!["📋 My List", "+ New", "🏆 3 Day Streak"]);
        assert!(card.image.ends_with("fid=5&completed=true&streak=3"));
    }

    #[test]
    fn test_card_buttons_match_kind_actions() {
        let links = links();
        let cards = [
            Card::entry(&links, 1),
            Card::empty_input(&links, 1),
            Card::added(&links, 1),
            Card::list(&links, 1, &[]),
            Card::completed(&links, 1, 0),
        ];
        for card in cards {
            let actions: Vec<_> = card.buttons.iter().map(|b| b.action).collect();
            assert_eq!(actions, card.kind.actions(), "{:?}", card.kind);
            assert_eq!(card.state.card, card.kind);
        }
    }

    #[test]
    fn test_action_at_is_one_based() {
        assert_eq!(CardKind::Entry.action_at(1), Some(ButtonAction::AddTodo));
        assert_eq!(CardKind::Entry.action_at(2), Some(ButtonAction::MyList));
        assert_eq!(CardKind::Entry.action_at(0), None);
        assert_eq!(CardKind::Entry.action_at(3), None);
        assert_eq!(CardKind::List.action_at(3), Some(ButtonAction::Refresh));
    }

    #[test]
    fn test_try_again_submits() {
        assert_eq!(ButtonAction::TryAgain.transition(), Transition::SubmitTodo);
        assert_eq!(ButtonAction::Refresh.transition(), Transition::ShowList);
        assert_eq!(ButtonAction::Streak.transition(), Transition::Compose);
    }

    #[test]
    fn test_response_wire_shape() {
        let response = FrameResponse::from(Card::entry(&links(), 7));
        let json = serde_json::to_value(&response).unwrap();
        let frame = &json["frames"][0];

        assert_eq!(frame["version"], "vNext");
        assert_eq!(frame["buttons"][0]["label"], "+ New Todo");
        assert!(frame["buttons"][0].get("action").is_none());
        assert_eq!(frame["input"]["text"], "What needs to be done?");

        let state: FrameState = serde_json::from_str(frame["state"].as_str().unwrap()).unwrap();
        assert_eq!(state.card, CardKind::Entry);
    }
}
