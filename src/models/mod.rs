pub mod comment;
pub mod like;
pub mod photo;

pub use comment::*;
pub use like::*;
pub use photo::*;
