#[tokio::main]
async fn main() {
    autopilot_app_lib::run().await;
}
