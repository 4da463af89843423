use rocket::{form::Form, http::Status, State};
use rocket_dyn_templates::Template;
use serde::{Deserialize, Serialize};

use database::{schema::cms::Article, sqlx::PgPool};

use super::{FullPathAndQuery, RequestData, ResultExt};

const SEARCH_RESULTS_LIMIT: i64 = 100;

#[derive(FromForm, Debug)]
pub struct SearchForm {
    search_query: String,
}

#[derive(Serialize, Deserialize)]
struct SearchResultsContext {
    request: RequestData,
    search_query: String,
    results: Vec<Article>,
}

#[post("/search", data = "<form>")]
pub async fn search(
    form: Form<SearchForm>,
    pool: &State<PgPool>,
    path: FullPathAndQuery,
) -> Result<Template, Status> {
    // The submitted text is forwarded verbatim; the store decides what an
    // empty or unmatchable query yields.
    let results = Article::search(&form.search_query, SEARCH_RESULTS_LIMIT, pool.inner())
        .await
        .map_sql_to_http()?;

    Ok(Template::render(
        "search_results",
        SearchResultsContext {
            request: RequestData::new(path),
            search_query: form.into_inner().search_query,
            results,
        },
    ))
}
