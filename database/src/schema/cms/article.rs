use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A published article. The `slug` is the public lookup key; the store
/// does not enforce slug uniqueness, so slug lookups return the first
/// match.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

#[derive(thiserror::Error, Debug)]
pub enum ArticleError {
    #[error("article is already persisted")]
    AlreadyPersisted,
    #[error("sql error: {0}")]
    Sql(#[from] sqlx::Error),
}

impl Article {
    pub fn new(title: String, body: String, slug: String) -> Self {
        Self {
            id: 0,
            title,
            body,
            slug,
            created_at: Utc::now(),
        }
    }

    /// An in-memory article that never touches the store, for pages that
    /// render fixed content.
    pub fn hardcoded(slug: &str, title: &str, body: &str) -> Self {
        Self {
            id: 0,
            title: title.to_owned(),
            body: body.to_owned(),
            slug: slug.to_owned(),
            created_at: Utc::now(),
        }
    }

    /// Inserts the article, assigning `id` and `created_at` from the
    /// store. There is no update path; saving a persisted article is an
    /// error.
    pub async fn save<'e, E: sqlx::Executor<'e, Database = sqlx::Postgres>>(
        &mut self,
        executor: E,
    ) -> Result<(), ArticleError> {
        if self.id != 0 {
            return Err(ArticleError::AlreadyPersisted);
        }

        let (id, created_at): (i64, DateTime<Utc>) = sqlx::query_as(
            "INSERT INTO articles (title, body, slug) VALUES ($1, $2, $3) RETURNING id, created_at",
        )
        .bind(&self.title)
        .bind(&self.body)
        .bind(&self.slug)
        .fetch_one(executor)
        .await?;

        self.id = id;
        self.created_at = created_at;

        Ok(())
    }

    pub async fn find_by_slug<'e, E: sqlx::Executor<'e, Database = sqlx::Postgres>>(
        slug: &str,
        executor: E,
    ) -> sqlx::Result<Option<Self>> {
        sqlx::query_as(
            "SELECT id, title, body, slug, created_at FROM articles WHERE slug = $1 LIMIT 1",
        )
        .bind(slug)
        .fetch_optional(executor)
        .await
    }

    /// Up to `limit` articles, newest first.
    pub async fn list_recent<'e, E: sqlx::Executor<'e, Database = sqlx::Postgres>>(
        limit: i64,
        executor: E,
    ) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as(
            "SELECT id, title, body, slug, created_at FROM articles \
             ORDER BY created_at DESC, id DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(executor)
        .await
    }

    /// Up to `limit` articles whose title or body matches `query` under
    /// the store's text index. Matching is tokenized and stemmed by
    /// Postgres; a query with no searchable terms matches nothing.
    pub async fn search<'e, E: sqlx::Executor<'e, Database = sqlx::Postgres>>(
        query: &str,
        limit: i64,
        executor: E,
    ) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as(
            "SELECT id, title, body, slug, created_at FROM articles \
             WHERE search_tsv @@ plainto_tsquery('english', $1) LIMIT $2",
        )
        .bind(query)
        .bind(limit)
        .fetch_all(executor)
        .await
    }

    pub async fn count<'e, E: sqlx::Executor<'e, Database = sqlx::Postgres>>(
        executor: E,
    ) -> sqlx::Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM articles")
            .fetch_one(executor)
            .await
    }

    pub async fn any<'e, E: sqlx::Executor<'e, Database = sqlx::Postgres>>(
        executor: E,
    ) -> sqlx::Result<bool> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM articles)")
            .fetch_one(executor)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    async fn save_article(pool: &PgPool, title: &str, body: &str, slug: &str) -> Article {
        let mut article = Article::new(title.to_owned(), body.to_owned(), slug.to_owned());
        article.save(pool).await.expect("failed to save article");
        article
    }

    #[sqlx::test]
    async fn count_tracks_saved_articles(pool: PgPool) -> anyhow::Result<()> {
        assert_eq!(Article::count(&pool).await?, 0);
        assert!(!Article::any(&pool).await?);

        for n in 0..3 {
            save_article(&pool, &format!("Title {}", n), "Body", &format!("slug-{}", n)).await;
        }

        assert_eq!(Article::count(&pool).await?, 3);
        assert!(Article::any(&pool).await?);

        Ok(())
    }

    #[sqlx::test]
    async fn save_assigns_id_and_timestamp(pool: PgPool) -> anyhow::Result<()> {
        let article = save_article(&pool, "Title", "Body", "slug").await;
        assert_ne!(article.id, 0);

        let loaded = Article::find_by_slug("slug", &pool)
            .await?
            .expect("saved article not found");
        assert_eq!(loaded.id, article.id);
        assert_eq!(loaded.created_at, article.created_at);

        Ok(())
    }

    #[sqlx::test]
    async fn save_rejects_persisted_article(pool: PgPool) -> anyhow::Result<()> {
        let mut article = save_article(&pool, "Title", "Body", "slug").await;

        let result = article.save(&pool).await;
        assert!(matches!(result, Err(ArticleError::AlreadyPersisted)));
        assert_eq!(Article::count(&pool).await?, 1);

        Ok(())
    }

    #[sqlx::test]
    async fn find_by_slug_matches_exactly(pool: PgPool) -> anyhow::Result<()> {
        save_article(&pool, "Default title", "Default body", "default-article").await;

        let found = Article::find_by_slug("default-article", &pool)
            .await?
            .expect("article not found by slug");
        assert_eq!(found.slug, "default-article");
        assert_eq!(found.title, "Default title");

        assert!(Article::find_by_slug("missing-slug", &pool).await?.is_none());
        // A prefix is not an exact match.
        assert!(Article::find_by_slug("default", &pool).await?.is_none());

        // Repeated lookups with no intervening writes are equivalent.
        let again = Article::find_by_slug("default-article", &pool)
            .await?
            .expect("article not found on second lookup");
        assert_eq!(again.id, found.id);
        assert_eq!(again.body, found.body);

        Ok(())
    }

    #[sqlx::test]
    async fn duplicate_slugs_return_a_single_match(pool: PgPool) -> anyhow::Result<()> {
        save_article(&pool, "First", "Body", "shared").await;
        save_article(&pool, "Second", "Body", "shared").await;

        let found = Article::find_by_slug("shared", &pool)
            .await?
            .expect("no article found for duplicated slug");
        assert_eq!(found.slug, "shared");

        Ok(())
    }

    #[sqlx::test]
    async fn list_recent_caps_results_and_orders_newest_first(pool: PgPool) -> anyhow::Result<()> {
        assert!(Article::list_recent(10, &pool).await?.is_empty());

        for n in 0..4 {
            save_article(&pool, &format!("Title {}", n), "Body", &format!("slug-{}", n)).await;
        }

        let capped = Article::list_recent(2, &pool).await?;
        assert_eq!(capped.len(), 2);
        assert_eq!(capped[0].title, "Title 3");
        assert_eq!(capped[1].title, "Title 2");

        let all = Article::list_recent(10, &pool).await?;
        assert_eq!(all.len(), 4);

        Ok(())
    }

    #[sqlx::test]
    async fn search_matches_title_and_body(pool: PgPool) -> anyhow::Result<()> {
        save_article(&pool, "Rust ownership", "Borrowing explained", "rust-ownership").await;
        save_article(&pool, "Gardening", "Growing tomatoes", "gardening").await;

        let by_title = Article::search("ownership", 100, &pool).await?;
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].slug, "rust-ownership");

        let by_body = Article::search("tomatoes", 100, &pool).await?;
        assert_eq!(by_body.len(), 1);
        assert_eq!(by_body[0].slug, "gardening");

        // Stemmed matching is delegated to the store.
        let stemmed = Article::search("tomato", 100, &pool).await?;
        assert_eq!(stemmed.len(), 1);

        Ok(())
    }

    #[sqlx::test]
    async fn search_caps_results(pool: PgPool) -> anyhow::Result<()> {
        for n in 0..5 {
            save_article(&pool, "Shared topic", "Body", &format!("slug-{}", n)).await;
        }

        let capped = Article::search("topic", 2, &pool).await?;
        assert_eq!(capped.len(), 2);

        Ok(())
    }

    #[sqlx::test]
    async fn search_returns_empty_for_no_match(pool: PgPool) -> anyhow::Result<()> {
        save_article(&pool, "Default title", "Default body", "default-article").await;

        assert!(Article::search("nonexistent", 100, &pool).await?.is_empty());
        assert!(Article::search("", 100, &pool).await?.is_empty());
        assert!(Article::search("   ", 100, &pool).await?.is_empty());

        Ok(())
    }
}
