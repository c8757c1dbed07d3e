pub mod classifier;
pub mod indicators;


pub use classifier::*;
pub use indicators::*;
