//! Service implementations for the provider APIs.

mod context;
pub mod credits;
pub mod images;
pub mod models;
pub mod tasks;

pub(crate) use context::ServiceContext;

pub use credits::{CreditsService, CreditsServiceImpl};
pub use images::{ImagesService, ImagesServiceImpl};
pub use models::list_models;
pub use tasks::{TasksService, TasksServiceImpl};
