#[tokio::main]
async fn main() {
    if let Err(err) = bookrec_api::run().await {
        tracing::error!(error = %err, "bookrec-api failed");
        std::process::exit(1);
    }
}
