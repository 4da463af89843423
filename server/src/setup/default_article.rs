use database::{schema::cms::Article, sqlx::PgPool};

pub const DEFAULT_TITLE: &str = "Default title";
pub const DEFAULT_BODY: &str = "Default body";
pub const DEFAULT_SLUG: &str = "default-article";

/// Seeds a starter article the first time the server starts against an
/// empty store.
pub async fn run(pool: &PgPool) -> anyhow::Result<()> {
    if !Article::any(pool).await? {
        let mut article = Article::new(
            String::from(DEFAULT_TITLE),
            String::from(DEFAULT_BODY),
            String::from(DEFAULT_SLUG),
        );
        article.save(pool).await?;

        println!("No articles found. Seeded '{}'.", article.slug);
    }

    Ok(())
}
