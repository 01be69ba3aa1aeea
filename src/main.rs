#[rocket::main]
async fn main() {
    if let Err(e) = scribe_server::rocket().launch().await {
        eprintln!("server error: {e}");
        std::process::exit(1);
    }
}
