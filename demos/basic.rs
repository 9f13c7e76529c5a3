use grokipedia_mcp::{GrokipediaClient, PageConfig, SearchConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = GrokipediaClient::new()?;

    let results = client
        .search("grok", SearchConfig::default().with_limit(10))
        .await?;
    for result in &results {
        println!("{} ({})", result.title, result.slug);
    }

    if let Some(first) = results.first() {
        let page = client.get_page(&first.slug, PageConfig::default()).await?;
        println!("\n# {} - {} citations", page.title, page.citations.len());
    }
    Ok(())
}
