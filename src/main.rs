use ideahub::{
    startup,
    telementry::{get_subscriber, init_subscriber},
};

#[tokio::main]
async fn main() {
    let subscriber = get_subscriber("ideahub".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);
    startup::run().await
}
