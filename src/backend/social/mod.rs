//! Social Module
//!
//! Photos, comments and likes. Same shape as `messaging`:
//!
//! - **`store`** - the `SocialStore` trait and `SocialError`
//! - **`db`** - PostgreSQL queries and `PgSocialStore`
//! - **`memory`** - `InMemorySocialStore`
//! - **`handlers`** - `/api/photos` and `/api/comments`

pub mod db;
pub mod handlers;
pub mod memory;
pub mod store;

pub use db::PgSocialStore;
pub use memory::InMemorySocialStore;
pub use store::{SocialError, SocialStore};
