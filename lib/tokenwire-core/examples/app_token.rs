use anyhow::Context;
use tokenwire_core::{AuthorizeRequest, Credentials, DEFAULT_REDIRECT_URI, ExchangeClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().pretty().init();

    let client_id = std::env::var("TWITCH_CLIENT_ID").context("TWITCH_CLIENT_ID is not set")?;
    let client_secret =
        std::env::var("TWITCH_CLIENT_SECRET").context("TWITCH_CLIENT_SECRET is not set")?;
    let credentials = Credentials::new(client_id, client_secret);

    // Create a client
    let client = ExchangeClient::twitch()?;

    // App access token
    let token = client.app_access_token(&credentials, "").await?;
    println!(
        "app token: {} (expires in {:?})",
        token.authorization_header(),
        token.expires_in()
    );

    // Browser URL for a user access token
    let url = client.authorize_url(
        &AuthorizeRequest::new(credentials.client_id(), DEFAULT_REDIRECT_URI)
            .add_scopes(["chat:read", "chat:edit"]),
    )?;
    println!("authorize the application at {url}");

    Ok(())
}
