pub mod field;
pub mod template;
pub mod value;
