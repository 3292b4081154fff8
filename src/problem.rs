mod offline;
mod online;
mod linop;
mod ocp;

pub use offline::*;
pub use online::*;
pub use linop::*;
pub use ocp::*;
