pub mod sales_service;
pub use sales_service::SalesService;
