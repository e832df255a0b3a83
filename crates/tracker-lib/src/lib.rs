//! `tracker-lib` - normalized application state for a project tracker.
//!
//! All state lives in one [`Snapshot`]: entity maps keyed by id, a per-project
//! board order, the recently created issue ids and the notification list.
//! State changes only through [`Command`]s applied by the pure
//! [`command::transition`]; the [`Store`] facade owns the current snapshot and
//! saves it through a [`PersistencePort`] after every applied command.
//!
//! # Quick Start
//!
//! ```no_run
//! use tracker_lib::{FileStorage, LinkType, NewIssue, PersistencePort, Status, Store};
//!
//! // Load saved state, or the demo workspace on first run
//! let mut store = Store::open(PersistencePort::new(FileStorage::new(".tracker")));
//!
//! // Create
//! let issue = store
//!     .create_issue(NewIssue {
//!         project: "WEB".into(),
//!         title: "Pricing page".into(),
//!         reporter_id: "u_alex".into(),
//!         ..Default::default()
//!     })
//!     .unwrap();
//!
//! // Move on the board
//! store.move_issue("p_web", &issue.id, Status::new(Status::IN_PROGRESS), Some(0));
//!
//! // Link, with the reciprocal kept in step
//! store.add_link(&issue.id, "WEB-2", LinkType::IsBlockedBy, None).unwrap();
//! ```

pub mod board;
pub mod command;
pub mod error;
pub mod links;
pub mod model;
pub mod persist;
pub mod query;
pub mod seed;
pub mod snapshot;
pub mod store;
pub mod util;
pub mod validation;

pub use board::BoardOrder;
pub use command::{Command, IssuePatch, Skipped, reduce, transition};
pub use error::{Result, TrackerError, ValidationError};
pub use model::{
    Comment, Issue, IssueLink, IssueType, LinkType, Notification, Organization, Priority, Project,
    Sprint, Status, User,
};
pub use persist::{DEFAULT_STATE_KEY, FileStorage, MemoryStorage, PersistencePort, Storage};
pub use query::{IssueFilters, IssueSort};
pub use seed::seed_snapshot;
pub use snapshot::Snapshot;
pub use store::{NewIssue, Store};
pub use validation::Violation;
