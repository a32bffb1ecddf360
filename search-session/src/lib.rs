//! Interactive state for the resource search box.
//!
//! A [`SearchSession`] owns the query being typed, the ranked results, the
//! selection cursor, inline suggestions and a bounded history of committed
//! queries. It talks to a shared [`cloudnav_resource_search::SearchEngine`]
//! and never renders anything itself: the host view feeds it [`SessionKey`]s
//! and reacts to the returned [`SessionEffect`].

mod config;
mod history;
mod keys;
mod session;

pub use config::DEFAULT_HISTORY_LIMIT;
pub use config::DEFAULT_INLINE_SUGGESTIONS;
pub use config::SessionConfig;
pub use history::SearchHistory;
pub use keys::SessionKey;
pub use session::SearchSession;
pub use session::SessionEffect;
pub use session::SessionState;
