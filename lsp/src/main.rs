#[tokio::main]
async fn main() {
    dragonstone_lsp::run().await;
}
