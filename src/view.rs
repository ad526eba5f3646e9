pub mod dashboard;
pub mod filters;
pub mod pagination;
pub mod panel;
pub mod stats;
pub mod table;
