pub mod region;
pub mod renderer;

pub use region::*;
pub use renderer::*;
