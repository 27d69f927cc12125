//! Application layer with the list controller, use cases and DTOs.

/// Data transfer objects.
pub mod dto;
/// View controllers.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use dto::{CredentialSource, SignInRequest, SignInResponse};
pub use services::{MountHandle, TodoListController, TodoListState};
pub use use_cases::{RestoreSessionUseCase, SignInUseCase};
