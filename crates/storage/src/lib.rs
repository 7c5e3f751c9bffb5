#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{
    AUTH_TOKEN_KEY, CredentialStore, InMemoryCredentialStore, Storage, StorageError, USER_DATA_KEY,
};
