//! Trait definitions for the collaborators the PortfolioHub core depends on.
//!
//! The core never talks to a concrete backend. Every workflow receives its
//! document stores, moderation classifier, identity provider and clock as
//! explicitly constructed trait objects.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod clock;
mod subscription;
mod traits;
mod types;

pub use clock::{Clock, SystemClock};
pub use subscription::{Snapshot, Subscription};
pub use traits::{
    AccountStore, Classifier, CommentStore, ConfigStore, IdentityProvider, ListingStore,
    Moderator,
};
pub use types::{Credentials, Identity};
