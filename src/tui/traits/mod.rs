//! Component trait system for TUI architecture
//!
//! Components declare their own capabilities through traits instead of App
//! knowing how to render or route input for every panel.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         App                                 │
//! │  (orchestrator: routes keys, owns router and page context)  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!              ┌───────────────┼───────────────┐
//!              ▼               ▼               ▼
//!        ┌──────────┐   ┌──────────┐   ┌──────────┐
//!        │   List   │   │ Facility │   │   Logs   │
//!        │  pages   │   │  detail  │   │  Panel   │
//!        └──────────┘   └──────────┘   └──────────┘
//! ```
//!
//! - [`Component`] - render + identity
//! - [`Interactive`] - self-contained keyboard handling
//! - [`Page`] - a routed screen whose tables take part in focus management
//! - [`Navigator`] - receives client-side navigation requests

mod component;
mod interactive;
mod page;

pub use component::{Component, RenderContext};
pub use interactive::{Handled, Interactive};
pub use page::{Navigator, Page};
