pub mod image;
pub mod recipe;
pub mod repository;
pub mod shopping_list;
pub mod types;
