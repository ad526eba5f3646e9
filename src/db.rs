pub mod sales_source;
pub use sales_source::SalesSource;
pub mod sales_repo;
pub use sales_repo::SalesRepository;
pub mod memory_source;
pub use memory_source::InMemorySalesSource;
