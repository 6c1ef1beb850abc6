#[tokio::main]
async fn main() {
    canvass::start_server().await;
}
