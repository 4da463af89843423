use database::{config, connection};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let url = config::database_url()?;
    let pool = connection::connect(&url).await?;
    database::initialize(&pool).await?;

    Ok(())
}
