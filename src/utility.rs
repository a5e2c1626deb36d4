pub mod id;
pub mod str;
pub mod xml;
