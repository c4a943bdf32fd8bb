//! Wire definitions for Todo-Cast.
//!
//! This crate defines the frame interaction protocol spoken with social-feed
//! clients (signed requests in, card documents out), the request and response
//! bodies of the companion API, and the bodies of the outbound points and
//! notification calls.

mod card;
mod error;
mod interaction;
mod links;
mod meta;
pub mod requests;
pub mod responses;

pub use card::*;
pub use error::*;
pub use interaction::*;
pub use links::*;
pub use meta::*;

/// Protocol version tag carried by every card.
pub const FRAME_VERSION: &str = "vNext";

/// Maximum number of open todos shown on the list card.
pub const LIST_CARD_LIMIT: u32 = 5;
