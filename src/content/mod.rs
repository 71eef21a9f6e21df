//! Content models and rendering

pub mod entity;
pub mod markdown;

pub use entity::{
    Author, AuthorMetadata, Category, CategoryMetadata, Entity, EntityKind, Image, Object, Post,
    PostMetadata,
};
