pub mod provider;

pub use provider::{SessionProvider, StaticSession, TokenSession};
