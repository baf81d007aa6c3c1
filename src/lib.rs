#![doc = include_str!("../README.md")]

pub mod bcd;
pub mod bitmap;
pub mod codepage;
pub mod error;
pub mod field;
pub mod message;
pub mod schema;
pub mod template;

pub use error::Error;
pub use message::{Message, MtiEncoding};
pub use schema::{FieldContainer, RawFieldSpec, Schema};
pub use template::TemplateRegistry;
