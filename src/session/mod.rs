// Session state: durable storage, credentials and expiry handling

pub mod credentials;
pub mod listener;
pub mod store;


pub use credentials::{Credentials, PROFILE_KEY, TOKEN_KEY};
pub use listener::{LoginRedirect, Navigator, NoopListener, SessionListener};
pub use store::{FileStore, KeyValueStore, MemoryStore};
