pub mod address;
pub mod extract;
pub mod sheets;
