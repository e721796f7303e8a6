pub mod build;
pub mod import;
pub mod production;
pub mod resource;
