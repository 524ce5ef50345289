//! In-process persistence adapters.
//!
//! Records live in `tokio::sync::RwLock`-guarded maps shared behind `Arc`, so
//! clones of an adapter see the same data. The user store keeps a unique index
//! on normalised email and reports violations as
//! [`UserPersistenceError::DuplicateKey`](crate::domain::ports::UserPersistenceError),
//! the way a database constraint would.
//!
//! # Example
//!
//! ```
//! use appliedto::outbound::persistence::InMemoryUserRepository;
//!
//! let repo = InMemoryUserRepository::new();
//! let shared = repo.clone();
//! # let _ = shared;
//! ```

mod memory_job_application_repository;
mod memory_user_repository;

pub use memory_job_application_repository::InMemoryJobApplicationRepository;
pub use memory_user_repository::InMemoryUserRepository;
