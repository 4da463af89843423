use rocket::{http::Status, State};
use rocket_dyn_templates::Template;
use serde::{Deserialize, Serialize};

use database::{schema::cms::Article, sqlx::PgPool};

use super::{FullPathAndQuery, RequestData, ResultExt};

// Fixed presentation limits; not configurable per request.
const RECENT_ARTICLES_LIMIT: i64 = 10;
const RELATED_ARTICLES_LIMIT: i64 = 3;

#[derive(Serialize, Deserialize)]
struct HomeContext {
    request: RequestData,
    articles_count: i64,
}

#[get("/")]
pub async fn home(pool: &State<PgPool>, path: FullPathAndQuery) -> Result<Template, Status> {
    let articles_count = Article::count(pool.inner()).await.map_sql_to_http()?;

    Ok(Template::render(
        "home",
        HomeContext {
            request: RequestData::new(path),
            articles_count,
        },
    ))
}

#[derive(Serialize, Deserialize)]
struct ArticleContext {
    request: RequestData,
    article: Article,
    related_articles: Vec<Article>,
}

#[get("/article/test")]
pub fn test_article(path: FullPathAndQuery) -> Template {
    let article = Article::hardcoded(
        "test",
        "Example article",
        "This page renders a fixed article without touching the store.",
    );

    Template::render(
        "article",
        ArticleContext {
            request: RequestData::new(path),
            article,
            related_articles: Vec::new(),
        },
    )
}

#[get("/article/<slug>")]
pub async fn article_by_slug(
    slug: String,
    pool: &State<PgPool>,
    path: FullPathAndQuery,
) -> Result<Template, Status> {
    let article = Article::find_by_slug(&slug, pool.inner())
        .await
        .map_sql_to_http()?
        .ok_or(Status::NotFound)?;

    // Related articles reuse the store's text search, seeded with the
    // article's own title. The article itself usually matches; drop it.
    let related_articles = Article::search(&article.title, RELATED_ARTICLES_LIMIT, pool.inner())
        .await
        .map_sql_to_http()?
        .into_iter()
        .filter(|related| related.id != article.id)
        .collect();

    Ok(Template::render(
        "article",
        ArticleContext {
            request: RequestData::new(path),
            article,
            related_articles,
        },
    ))
}

#[derive(Serialize, Deserialize)]
struct ListArticlesContext {
    request: RequestData,
    articles_list: Vec<Article>,
}

#[get("/list/article")]
pub async fn list_articles(
    pool: &State<PgPool>,
    path: FullPathAndQuery,
) -> Result<Template, Status> {
    let articles_list = Article::list_recent(RECENT_ARTICLES_LIMIT, pool.inner())
        .await
        .map_sql_to_http()?;

    Ok(Template::render(
        "list_articles",
        ListArticlesContext {
            request: RequestData::new(path),
            articles_list,
        },
    ))
}
