//! In-memory backends for PortfolioHub.
//!
//! Each store keeps its documents behind a `tokio::sync::RwLock` and publishes
//! a fresh snapshot through a `watch` channel after every committed write.
//! Read-modify-write operations run under a single write lock, which makes
//! counter increments and guarded debits atomic.
//!
//! # Example
//!
//! ```
//! use portfoliohub_core::{Account, AccountId, BalanceDelta};
//! use portfoliohub_interface::AccountStore;
//! use portfoliohub_storage::InMemoryAccountStore;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let store = InMemoryAccountStore::new();
//! let id = AccountId::from("ada");
//! store
//!     .insert_account(&Account::new_member(id.clone(), "Ada", None, 25, chrono::Utc::now()))
//!     .await
//!     .unwrap();
//! let updated = store.increment(&id, BalanceDelta::points(2)).await.unwrap();
//! assert_eq!(updated.points, 27);
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod accounts;
mod clock;
mod collection;
mod comments;
mod config;
mod identity;
mod listings;

pub use accounts::InMemoryAccountStore;
pub use clock::ManualClock;
pub use comments::InMemoryCommentStore;
pub use config::InMemoryConfigStore;
pub use identity::LocalIdentityProvider;
pub use listings::InMemoryListingStore;
