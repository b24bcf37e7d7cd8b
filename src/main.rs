#[tokio::main]
async fn main() -> anyhow::Result<()> {
    vibe_check_lib::run().await
}
