pub mod market;
pub mod ranking;
pub mod trading;

pub use market::*;
pub use ranking::*;
pub use trading::*;
