pub mod asset;
pub mod production;
