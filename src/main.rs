use archive_ui::favorite::Settled;
use archive_ui::{Config, HttpEndpoint, Page, load_page, persist_page};
use chrono::Local;
use std::env;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

const USAGE: &str = "usage: archive_ui show | archive_ui toggle <entry-id>";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let args: Vec<String> = env::args().skip(1).collect();

    let snapshot = load_page(&config.page_path).await;
    info!(
        "loaded {} entries from {}",
        snapshot.entries.len(),
        config.page_path.display()
    );
    let mut page = Page::new(snapshot, &config);

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] | ["show"] => print_entries(&page),
        ["toggle", entry_id] => {
            let endpoint = HttpEndpoint::new(&config.root_url, config.request_timeout)?;
            info!("sending favorite change to {}", endpoint.url());
            for settled in page.toggle_favorite(entry_id, &endpoint).await? {
                report(entry_id, &settled);
            }
            for notice in page.notices().active(Local::now()) {
                eprintln!("{}", notice.message);
            }
            persist_page(&config.page_path, &page.snapshot()).await?;
            print_entries(&page);
        }
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }

    Ok(())
}

fn print_entries(page: &Page) {
    for entry in page.snapshot().entries {
        let heart = if entry.favorite { "fav" } else { "-" };
        println!("{}\t{}\t{}", entry.id, heart, entry.title);
    }
}

fn report(entry_id: &str, settled: &Settled) {
    match settled {
        Settled::Confirmed => println!("entry {entry_id}: favorite saved"),
        Settled::Rejected { message, .. } => println!("entry {entry_id}: server error: {message}"),
        Settled::RolledBack { message } => println!("entry {entry_id}: request failed: {message}"),
        Settled::Stale => {}
    }
}
