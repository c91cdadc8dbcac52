pub mod allow_list;
pub mod article;
pub mod related;
