#[tokio::main]
async fn main() {
    manege_backend::run().await;
}
