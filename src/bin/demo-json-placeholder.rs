use anyhow::{Context, Result};
use clap::Parser;
use restgate::{Gateway, HttpMethod, RequestOptions};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::info;

/// Walk through the gateway against the JSONPlaceholder API.
#[derive(Parser, Debug)]
#[command(name = "demo-json-placeholder", version, about = "Gateway demo against JSONPlaceholder")]
struct Cli {
    #[arg(long, default_value = "https://jsonplaceholder.typicode.com")]
    base_url: String,

    /// Minimum delay between requests in milliseconds
    #[arg(long, default_value_t = 250)]
    rate_limit_ms: u64,

    #[arg(long, default_value = "logs")]
    log_dir: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Post {
    id: u64,
    user_id: u64,
    title: String,
    body: String,
}

struct JsonPlaceholderGateway {
    gateway: Gateway,
}

impl JsonPlaceholderGateway {
    fn new(base_url: &str, rate_limit: Duration) -> Self {
        Self {
            gateway: Gateway::builder(base_url)
                .default_header("Accept", "application/json")
                .rate_limit(rate_limit)
                .build(),
        }
    }

    fn get_post(&mut self, id: u64) -> Result<Option<Post>> {
        let resp = self.gateway.execute(
            RequestOptions::get(format!("/posts/{}", id))
                .expect(200)
                .call_origin(concat!(file!(), ":get_post")),
        )?;
        resp.map(|r| r.json().context("invalid post body")).transpose()
    }

    fn list_posts(&mut self, limit: usize) -> Result<Vec<Post>> {
        let resp = self.gateway.execute(
            RequestOptions::get("/posts")
                .query("_limit", limit)
                .expect(200)
                .call_origin(concat!(file!(), ":list_posts")),
        )?;
        match resp {
            Some(r) => r.json().context("invalid post list"),
            None => Ok(Vec::new()),
        }
    }

    fn create_post(&mut self, title: &str, body: &str, user_id: u64) -> Result<Option<Post>> {
        let resp = self.gateway.execute(
            RequestOptions::post("/posts")
                .json(json!({"title": title, "body": body, "userId": user_id}))
                .expect(201)
                .call_origin(concat!(file!(), ":create_post")),
        )?;
        resp.map(|r| r.json().context("invalid created post")).transpose()
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();
    let _guard = restgate::logging::init_logging(&args.log_dir);

    let mut api = JsonPlaceholderGateway::new(&args.base_url, Duration::from_millis(args.rate_limit_ms));

    info!("1. Fetching a single post");
    if let Some(post) = api.get_post(1)? {
        let preview: String = post.body.chars().take(50).collect();
        println!("Post {} by user {}: {}", post.id, post.user_id, post.title);
        println!("  {}...", preview);
    }

    info!("2. Listing posts");
    for (i, post) in api.list_posts(3)?.iter().enumerate() {
        println!("{}. {}", i + 1, post.title);
    }

    info!("3. Creating a new post");
    if let Some(post) = api.create_post(
        "My Test Post",
        "This is a test post created via the API gateway.",
        1,
    )? {
        println!("Created post with ID: {}", post.id);
    }

    info!("4. Error handling");
    let resp = api.gateway.execute(
        RequestOptions::new(HttpMethod::Get, "/posts/999999").expect(200),
    )?;
    if resp.is_none() {
        println!("Request failed as expected (post not found)");
    }

    println!(
        "connected={} last_error={:?} last_request_time={:?}",
        api.gateway.is_connected(),
        api.gateway.last_error().map(|e| e.to_string()),
        api.gateway.last_request_time()
    );

    Ok(())
}
