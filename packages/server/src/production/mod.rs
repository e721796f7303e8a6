mod manager;

pub use manager::{Compensation, ProductionError, ProductionManager, normalize_name};
