pub mod book;
pub mod errors;
pub mod user;
pub mod value_objects;

pub use book::*;
pub use errors::*;
pub use user::*;
pub use value_objects::*;
