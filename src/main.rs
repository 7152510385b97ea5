use tracing::error;

#[tokio::main]
async fn main() {
    if let Err(error) = studio_desk::run().await {
        error!("studio-desk exited with error: {}", error);
        eprintln!("studio-desk exited with error: {error:#}");
        std::process::exit(1);
    }
}
