use clap::{Parser, Subcommand};
use like_toggle::config::ApiConfig;
use like_toggle::net::http::HttpLikeApi;
use like_toggle::{CafeId, ClickOutcome, LikeAction, LikeApi, LikeError, LikeToggleWidget, MemoryControl};
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Like(#[from] LikeError),
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

#[derive(Parser, Debug)]
#[command(name = "likes", about = "Check and toggle cafe likes against a likes service")]
struct Cli {
    /// Overrides `LIKES_BASE_URL` / the built-in default.
    #[arg(long)]
    base_url: Option<String>,

    /// Raw `Cookie` header carrying the logged-in session.
    #[arg(long, env = "LIKES_SESSION_COOKIE")]
    cookie: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print whether the cafe is liked.
    Status { cafe_id: CafeId },
    /// Like the cafe.
    Like { cafe_id: CafeId },
    /// Unlike the cafe.
    Unlike { cafe_id: CafeId },
    /// Run the button flow once: render, click, print the new label.
    Toggle { cafe_id: CafeId },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let api = build_api(cli.base_url.as_deref(), cli.cookie.as_deref())?;
    tracing::debug!(base_url = %api.config().base_url, "likes client ready");

    match cli.command {
        Command::Status { cafe_id } => {
            let liked = api.check_like(cafe_id).await?;
            println!("{}", if liked { "liked" } else { "not liked" });
        }
        Command::Like { cafe_id } => write(&api, LikeAction::Like, cafe_id).await?,
        Command::Unlike { cafe_id } => write(&api, LikeAction::Unlike, cafe_id).await?,
        Command::Toggle { cafe_id } => toggle(api, cafe_id).await?,
    }
    Ok(())
}

fn build_api(base_url: Option<&str>, cookie: Option<&str>) -> Result<HttpLikeApi, CliError> {
    let mut config = ApiConfig::from_env()?;
    if let Some(url) = base_url {
        config.base_url = url.trim().trim_end_matches('/').to_owned();
    }

    let mut headers = HeaderMap::new();
    if let Some(cookie) = cookie {
        headers.insert(COOKIE, HeaderValue::from_str(cookie)?);
    }
    Ok(HttpLikeApi::with_default_headers(config, headers)?)
}

async fn write(api: &HttpLikeApi, action: LikeAction, cafe_id: CafeId) -> Result<(), CliError> {
    let receipt = api.submit(action, cafe_id).await?.into_result(action)?;
    println!("{action} cafe {cafe_id}: status {}", receipt.status);
    Ok(())
}

async fn toggle(api: HttpLikeApi, cafe_id: CafeId) -> Result<(), CliError> {
    let widget = LikeToggleWidget::new(MemoryControl::new(cafe_id.to_string()), api);
    let before = widget.start().await?;
    tracing::info!(%cafe_id, ?before, "button rendered");

    match widget.handle_like_click().await? {
        ClickOutcome::Toggled(state) => {
            println!("{:?} -> {state:?}: button shows \"{}\"", before, widget.control().label());
        }
        ClickOutcome::Ignored => println!("click ignored"),
    }
    Ok(())
}
