pub mod query_state;
pub mod session;
