//! # seed
//!
//! Fills the configured document store with demo profiles and posts, then
//! prints a development bearer token for each demo user.

use std::sync::Arc;

use anyhow::Context;
use auth_adapters::{JwtConfig, JwtIdentityVerifier};
use chrono::Duration;
use configs::{Settings, StoreBackend};
use domains::{CallerIdentity, CommentRepository, PostRepository, UserRepository};
use secrecy::ExposeSecret;
use services::{CommentService, ContentLimits, PostService, UserService};
use storage_adapters::MemoryDocumentStore;
use tracing::{info, warn};

const TOKEN_TTL_DAYS: i64 = 7;

struct DemoUser {
    id: &'static str,
    name: &'static str,
    email: &'static str,
    bio: &'static str,
    posts: &'static [&'static str],
}

const DEMO_USERS: &[DemoUser] = &[
    DemoUser {
        id: "demo-ada",
        name: "Ada Lovelace",
        email: "ada@linksphere.dev",
        bio: "Poetical science.",
        posts: &[
            "Loving #javascript and #webdev",
            "Notes on the analytical engine #history #computing",
        ],
    },
    DemoUser {
        id: "demo-grace",
        name: "Grace Hopper",
        email: "grace@linksphere.dev",
        bio: "It's easier to ask forgiveness.",
        posts: &["#javascript is great", "Found a moth in the relay #debugging"],
    },
    DemoUser {
        id: "demo-linus",
        name: "Linus",
        email: "linus@linksphere.dev",
        bio: "",
        posts: &["Talk is cheap #programming"],
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let settings = Settings::load().context("loading settings")?;

    let verifier = Arc::new(JwtIdentityVerifier::new(JwtConfig {
        secret: settings
            .auth
            .jwt_secret
            .as_ref()
            .map(|s| s.expose_secret().as_bytes().to_vec())
            .unwrap_or_default(),
        issuer: settings.auth.issuer.clone(),
        audience: settings.auth.audience.clone(),
    }));

    match settings.store.backend {
        StoreBackend::Memory => {
            warn!("store.backend is \"memory\"; demo data only lives for this process");
            seed(Arc::new(MemoryDocumentStore::new()), verifier.clone()).await?;
        }
        StoreBackend::Postgres => seed_postgres(&settings, verifier.clone()).await?,
    }

    for user in DEMO_USERS {
        let token = verifier.issue_token(&identity(user), Duration::days(TOKEN_TTL_DAYS))?;
        println!("{:<12} Bearer {token}", user.id);
    }
    Ok(())
}

#[cfg(feature = "db-postgres")]
async fn seed_postgres(settings: &Settings, verifier: Arc<JwtIdentityVerifier>) -> anyhow::Result<()> {
    let url = settings
        .database
        .url
        .as_ref()
        .context("database.url is not set")?;
    let store = storage_adapters::PgDocumentStore::connect(
        url.expose_secret(),
        settings.database.max_connections,
    )
    .await?;
    seed(Arc::new(store), verifier).await
}

#[cfg(not(feature = "db-postgres"))]
async fn seed_postgres(_: &Settings, _: Arc<JwtIdentityVerifier>) -> anyhow::Result<()> {
    anyhow::bail!("seeding postgres needs a build with the `db-postgres` feature")
}

fn identity(user: &DemoUser) -> CallerIdentity {
    CallerIdentity::new(user.id)
        .with_name(user.name)
        .with_email(user.email)
}

async fn seed<S>(store: Arc<S>, verifier: Arc<JwtIdentityVerifier>) -> anyhow::Result<()>
where
    S: PostRepository + CommentRepository + UserRepository + 'static,
{
    let posts = PostService::new(store.clone(), store.clone(), ContentLimits::default());
    let comments = CommentService::new(store.clone(), store.clone(), ContentLimits::default());
    let users = UserService::new(store, verifier.clone());

    let mut first_post = None;
    for user in DEMO_USERS {
        let caller = identity(user);
        verifier.remember(caller.clone());
        users.create_profile(&caller, Some(user.bio.to_string())).await?;
        for content in user.posts {
            let view = posts.create_post(&caller, Some(content.to_string())).await?;
            first_post.get_or_insert(view.id);
        }
        info!(user = user.id, posts = user.posts.len(), "seeded user");
    }

    if let Some(post_id) = first_post {
        for user in DEMO_USERS.iter().skip(1) {
            let caller = identity(user);
            posts.toggle_like(&caller, &post_id).await?;
            comments
                .add_comment(&caller, &post_id, Some(format!("Nice one! - {}", user.name)))
                .await?;
        }
    }
    Ok(())
}
