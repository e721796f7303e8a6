mod build;
mod common;
mod import;
mod production;
mod resource;
