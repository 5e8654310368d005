pub mod classify;
pub mod schema;
pub mod serve;
