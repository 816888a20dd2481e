//! Cross-filter selection: immutable snapshots, typed interactions and a
//! pure reducer.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │    Charts    │────►│ Interaction  │────►│   Reducer    │
//! │ (click/brush)│     │  (typed msg) │     │  (pure fn)   │
//! └──────────────┘     └──────────────┘     └──────────────┘
//!        ▲                                         │
//!        │             ┌──────────────┐            ▼
//!        └─────────────│  View models │◄──── SelectionState
//!                      └──────────────┘       (hashed)
//! ```

pub mod events;
pub mod reducer;
pub mod state;

pub use events::{Interaction, ViewId};
pub use reducer::{reduce, replay, Transition};
pub use state::{DrillFilter, DrillKind, SelectionState};
