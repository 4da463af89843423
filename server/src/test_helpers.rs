use database::sqlx::PgPool;
use rocket::local::asynchronous::Client;

use crate::{setup, webserver};

pub async fn test_client(pool: PgPool) -> Client {
    let rocket = webserver::rocket_server(pool).expect("failed to build rocket instance");
    Client::tracked(rocket)
        .await
        .expect("failed to build test client")
}

pub async fn seed_default_article(pool: &PgPool) {
    setup::default_article::run(pool)
        .await
        .expect("failed to seed default article");
}
