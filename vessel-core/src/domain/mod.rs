mod ais;
mod category;
mod vessel;

pub use ais::*;
pub use category::*;
pub use vessel::*;
