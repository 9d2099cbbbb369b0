pub mod despread;
pub mod guard;
pub mod pn;
pub mod spread;

pub use despread::*;
pub use guard::*;
pub use pn::*;
pub use spread::*;
