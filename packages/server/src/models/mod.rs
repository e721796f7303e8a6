pub mod import;
pub mod production;
pub mod resource;
