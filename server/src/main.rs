#[macro_use]
extern crate rocket;

use anyhow::Context;
use database::config;

mod setup;
#[cfg(test)]
mod test_helpers;
mod webserver;

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let url = config::database_url()?;
    let pool = database::connection::connect(&url)
        .await
        .context("unable to connect to the article store")?;

    database::initialize(&pool)
        .await
        .context("error applying schema migrations")?;
    setup::default_article::run(&pool).await?;

    webserver::rocket_server(pool)?.launch().await?;

    Ok(())
}
