pub mod sales;
pub mod sessions;
