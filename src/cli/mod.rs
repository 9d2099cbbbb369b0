pub mod embed;
pub mod extract;
pub mod info;

pub use embed::*;
pub use extract::*;
pub use info::*;
