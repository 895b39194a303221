pub mod config;
pub mod constants;
pub mod debounce;
pub mod error;
pub mod geometry;
pub mod magnetic;
pub mod particles;
pub mod pointer;
pub mod proximity;
pub mod scheduler;
pub mod scramble;
pub mod visibility;

pub use config::*;
pub use constants::*;
pub use debounce::*;
pub use error::*;
pub use geometry::*;
pub use magnetic::*;
pub use particles::*;
pub use pointer::*;
pub use proximity::*;
pub use scheduler::*;
pub use scramble::*;
pub use visibility::*;
