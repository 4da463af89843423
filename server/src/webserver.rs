use std::{collections::HashMap, env, path::PathBuf};

use comrak::ComrakOptions;
use rocket::{
    fs::FileServer,
    http::Status,
    request::{FromRequest, Outcome},
    Build, Request, Rocket,
};
use rocket_dyn_templates::{tera, tera::Value, Template};
use serde::{Deserialize, Serialize};

use database::sqlx::{self, PgPool};

mod articles;
mod search;

pub fn rocket_server(pool: PgPool) -> anyhow::Result<Rocket<Build>> {
    let root_path = if let Ok(value) = env::var("CARGO_MANIFEST_DIR") {
        let path = PathBuf::from(value);
        path.parent()
            .map(|parent| parent.to_path_buf())
            .unwrap_or(path)
    } else {
        std::env::current_dir()?
    };

    env::set_var("ROCKET_TEMPLATE_DIR", root_path.join("templates"));

    Ok(rocket::build()
        .manage(pool)
        .attach(Template::custom(|engines| {
            engines
                .tera
                .register_filter("render_markdown", MarkdownFilter);
        }))
        .attach(cors_fairing()?)
        .mount(
            "/",
            routes![
                articles::home,
                articles::test_article,
                articles::article_by_slug,
                articles::list_articles,
                search::search,
            ],
        )
        .mount("/static", FileServer::from(root_path.join("static")))
        .register("/", catchers![not_found]))
}

/// All origins, all methods, all headers, credentials allowed. A
/// configuration choice of this site, not a protocol requirement.
fn cors_fairing() -> Result<rocket_cors::Cors, rocket_cors::Error> {
    rocket_cors::CorsOptions {
        allowed_origins: rocket_cors::AllowedOrigins::all(),
        allowed_headers: rocket_cors::AllowedHeaders::all(),
        allow_credentials: true,
        ..Default::default()
    }
    .to_cors()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RequestData {
    pub current_path: String,
    pub current_query: Option<String>,
    pub current_path_and_query: String,
}

#[derive(Debug)]
pub struct FullPathAndQuery {
    pub path: String,
    pub query: Option<String>,
}

impl RequestData {
    pub fn new(path: FullPathAndQuery) -> Self {
        let mut current_path_and_query = path.path.clone();
        if let Some(query) = &path.query {
            current_path_and_query += "?";
            current_path_and_query += query;
        }

        Self {
            current_path: path.path,
            current_query: path.query,
            current_path_and_query,
        }
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for FullPathAndQuery {
    type Error = std::convert::Infallible;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let path = request.uri().path().to_string();
        let query = request.uri().query().map(|q| q.to_string());

        Outcome::Success(FullPathAndQuery { path, query })
    }
}

struct MarkdownFilter;

impl tera::Filter for MarkdownFilter {
    fn filter(&self, markdown_source: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
        let markdown = markdown_source.as_str().ok_or_else(|| {
            tera::Error::msg("Value passed to markdown filter needs to be a string")
        })?;
        Ok(Value::String(comrak::markdown_to_html(
            markdown,
            &ComrakOptions::default(),
        )))
    }

    fn is_safe(&self) -> bool {
        true
    }
}

trait ResultExt<T> {
    fn map_sql_to_http(self) -> Result<T, Status>;
}

impl<T> ResultExt<T> for Result<T, sqlx::Error> {
    fn map_sql_to_http(self) -> Result<T, Status> {
        self.map_err(|err| match err {
            sqlx::Error::RowNotFound => Status::NotFound,
            other_error => {
                log::error!("unexpected sql error: {:?}", other_error);
                Status::InternalServerError
            }
        })
    }
}

#[derive(Serialize, Deserialize)]
struct NotFoundContext {
    uri: String,
}

#[catch(404)]
fn not_found(request: &Request<'_>) -> Template {
    Template::render(
        "404",
        NotFoundContext {
            uri: request.uri().to_string(),
        },
    )
}
