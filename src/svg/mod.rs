pub mod bbox;
pub mod document;
pub mod groups;
pub mod select;
