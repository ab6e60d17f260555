mod authenticator;

pub use authenticator::{Authenticator, SessionExpiredHook};
