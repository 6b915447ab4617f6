//! Session state and its single owner.

mod event;
mod owner;
mod state;

pub use event::{Generation, OwnerUpdate, WorkerEvent};
pub use owner::{SessionOwner, TriageServices};
pub use state::{ClassificationSession, SessionSettings, TriageMode};
