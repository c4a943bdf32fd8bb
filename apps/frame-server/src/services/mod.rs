//! Collaborators reached over HTTP and the logic shared between handlers.

pub mod completion;
pub mod notifier;
pub mod outbound;
pub mod points;
pub mod verifier;
