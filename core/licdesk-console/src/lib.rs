//! Console controller for the licdesk admin console.
//!
//! The controller is split into a pure part and an async part:
//!
//! - [`dispatch`] takes the current [`ConsoleState`] and an [`Event`] and
//!   returns the [`Command`]s to run. It never touches the network, so every
//!   transition is testable in isolation.
//! - [`Console`] executes those commands against a
//!   [`licdesk_gateway::RemoteGateway`] and a [`Frontend`], feeding each
//!   completion back as another event.
//!
//! Views move `Auth → Dashboard ⇄ License`. Overlays (register and activate
//! modals) are a separate axis and can be opened or dismissed from any view.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod gate;
pub mod render;
pub mod runtime;
pub mod state;

pub use config::{AuthConfig, ConsoleConfig};
pub use dispatch::dispatch;
pub use error::{ConsoleError, ConsoleResult};
pub use event::{Command, Event, Notice, NoticeKind};
pub use gate::{password_digest, LoginGate, OperatorAccount, DEFAULT_MAX_LOGIN_ATTEMPTS};
pub use render::{project, UserLink, UserViews, USERS_HEADING};
pub use runtime::{Console, Frontend};
pub use state::{ConsoleState, Field, Forms};
