//! HTTP client for the idlhub repository, plus the push and pull
//! operations the `idl` binary drives.

pub mod client;
pub mod error;
pub mod pull;
pub mod push;

pub use client::RepositoryClient;
pub use error::{ClientError, ClientResult};
pub use pull::{pull, PullOptions};
pub use push::{push, PushOptions};
