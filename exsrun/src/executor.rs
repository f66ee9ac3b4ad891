mod impls;
pub mod traits;
mod types;

pub use types::*;
