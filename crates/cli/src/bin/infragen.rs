use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    infragen_cli::main_entry().await
}
