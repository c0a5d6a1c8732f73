use classified_ads::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    services::auth_service::hash_password,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_url, 2).await?;
    run_migrations(&pool).await?;

    let seller_id = ensure_user(&pool, "seller@example.com", "seller123").await?;
    let buyer_id = ensure_user(&pool, "buyer@example.com", "buyer123").await?;
    seed_ads(&pool, seller_id).await?;

    tracing::info!(%seller_id, %buyer_id, "seed completed");
    Ok(())
}

async fn ensure_user(pool: &sqlx::PgPool, email: &str, password: &str) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash)
        VALUES ($1, $2, $3)
        ON CONFLICT (email) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .fetch_optional(pool)
    .await?;

    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    tracing::info!(email, "ensured user");
    Ok(user_id)
}

async fn seed_ads(pool: &sqlx::PgPool, owner_id: Uuid) -> anyhow::Result<()> {
    let ads = [
        ("Road bike", "Red aluminium road bike, 56cm frame", Some(35000_i64), &["bike", "sport"][..]),
        ("Ferris plush", "Barely used crab plush", Some(1500), &["toys"][..]),
        ("Desk lamp", "Warm light, works fine", None, &[][..]),
    ];

    let mut tx = pool.begin().await?;
    for (title, text, price, tags) in ads {
        let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM ads WHERE title = $1")
            .bind(title)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_some() {
            continue;
        }

        let ad_id = Uuid::new_v4();
        sqlx::query("INSERT INTO ads (id, title, text, price, owner_id) VALUES ($1, $2, $3, $4, $5)")
            .bind(ad_id)
            .bind(title)
            .bind(text)
            .bind(price)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;

        for tag in tags {
            sqlx::query("INSERT INTO tags (id, name) VALUES ($1, $2) ON CONFLICT (name) DO NOTHING")
                .bind(Uuid::new_v4())
                .bind(*tag)
                .execute(&mut *tx)
                .await?;
            sqlx::query(
                r#"
                INSERT INTO ad_tags (ad_id, tag_id)
                SELECT $1, id FROM tags WHERE name = $2
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(ad_id)
            .bind(*tag)
            .execute(&mut *tx)
            .await?;
        }
    }
    tx.commit().await?;

    tracing::info!("seeded ads");
    Ok(())
}
