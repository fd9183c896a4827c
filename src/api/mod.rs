pub mod auth;
pub mod city_handlers;
pub mod handlers;
pub mod routes;
pub mod state_handlers;

pub use auth::*;
pub use handlers::*;
pub use routes::*;
