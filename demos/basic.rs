use ggtasker::{ErrorKind, GgtaskerClient};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = GgtaskerClient::from_env()?;

    let username = std::env::var("GGTASKER_USERNAME")?;
    let password = std::env::var("GGTASKER_PASSWORD")?;
    let token = client.request_token(&username, &password).await?;

    let created = client
        .add_user(&json!({"Username": "kit", "Email": "kit@example.com"}), &token)
        .await?;
    println!("created: {created}");

    match client.get_user_details("kit", &token).await {
        Ok(details) => println!("details: {details}"),
        Err(err) if err.kind() == ErrorKind::Application => {
            for entry in err.error_response().map(|r| r.errors()).unwrap_or_default() {
                eprintln!("{}: {}", entry.code, entry.message);
            }
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
