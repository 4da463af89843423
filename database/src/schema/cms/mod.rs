mod article;

pub use article::{Article, ArticleError};
