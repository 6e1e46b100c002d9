pub mod completion;
pub mod image;
pub mod pokemon;
