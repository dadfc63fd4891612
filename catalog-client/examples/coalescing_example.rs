use catalog_client::{CatalogClient, Filters, Status};
use futures::future::join_all;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    let client = CatalogClient::new();
    let filters = Filters::default().with_status(Some(Status::Alive));

    // Five identical requests issued together share one network call
    println!("=== Coalesced listing ===");
    let start = std::time::Instant::now();
    let pages = join_all((0..5).map(|_| client.fetch_page(1, "rick", &filters))).await;
    println!("5 identical requests took: {:?}", start.elapsed());
    println!("Pending table: {:?}", client.pending_stats());

    let page = pages.into_iter().next().expect("five requests were issued")?;
    println!(
        "{} matching characters over {} pages",
        page.info.count, page.info.pages
    );

    // A search with no matches is an empty page, not an error
    println!("\n=== No matches ===");
    let empty = client
        .fetch_page(1, "zzzznonexistent", &Filters::default())
        .await?;
    println!("Empty result: {} characters", empty.results.len());

    // Episode appearances for the first match
    if let Some(character) = page.results.first() {
        println!("\n=== Episodes of {} ===", character.name);
        for episode in client.fetch_episodes(character).await? {
            println!("{} {}", episode.episode, episode.name);
        }
    }

    Ok(())
}
