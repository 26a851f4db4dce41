pub mod financial;
pub mod response;

pub use financial::*;
pub use response::*;
