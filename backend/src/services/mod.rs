pub mod schema;
pub mod session;
