pub mod notice;
pub mod record;
pub mod schema;
pub mod session;
pub mod validation;
