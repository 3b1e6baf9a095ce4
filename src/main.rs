#[tokio::main]
async fn main() -> anyhow::Result<()> {
    botbridge_lib::run().await
}
