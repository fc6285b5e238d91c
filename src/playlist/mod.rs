pub mod config;
pub mod container;
pub mod filters;
pub mod generator;
pub mod metadata;


pub use config::*;
pub use container::*;
pub use filters::matches;
pub use generator::*;
pub use metadata::*;
