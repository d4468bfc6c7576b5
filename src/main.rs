#[tokio::main]
async fn main() {
    if let Err(e) = glowdesk_lib::run().await {
        eprintln!("glowdesk: {e}");
        std::process::exit(1);
    }
}
