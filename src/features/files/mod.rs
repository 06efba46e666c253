pub mod catalog;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use catalog::PgFileCatalog;
pub use routes::routes;
pub use services::FileService;
