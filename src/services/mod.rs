pub mod filter_service;
pub mod selection_service;
