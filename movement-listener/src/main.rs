use std::io;
use std::sync::Arc;

use tracing::{error, info};

use movement_listener::feed::{FeedConfig, FeedSession, MockFeedSession};
use movement_listener::lookup::{CompanyDirectory, StationDirectory};
use movement_listener::processor::MessageProcessor;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Credentials are consumed by broker-backed sessions; the replay
    // session runs without them.
    let username = std::env::var("NR_DATAFEEDS_USERNAME").unwrap_or_else(|_| {
        eprintln!("Warning: NR_DATAFEEDS_USERNAME not set. Broker sessions will fail.");
        String::new()
    });
    let password = std::env::var("NR_DATAFEEDS_PASSWORD").unwrap_or_else(|_| {
        eprintln!("Warning: NR_DATAFEEDS_PASSWORD not set. Broker sessions will fail.");
        String::new()
    });
    let config = FeedConfig::new(&username, &password);

    let locations = match std::env::var("MOVEMENTS_LOCATIONS") {
        Ok(path) => {
            let table = StationDirectory::load(&path).expect("Failed to load location table");
            println!("Loaded {} locations from {path}", table.len());
            table
        }
        Err(_) => {
            eprintln!("Warning: MOVEMENTS_LOCATIONS not set. Locations will render as null.");
            StationDirectory::empty()
        }
    };
    let companies = match std::env::var("MOVEMENTS_COMPANIES") {
        Ok(path) => {
            let table = CompanyDirectory::load(&path).expect("Failed to load company table");
            println!("Loaded {} companies from {path}", table.len());
            table
        }
        Err(_) => {
            eprintln!("Warning: MOVEMENTS_COMPANIES not set. Companies will render as null.");
            CompanyDirectory::empty()
        }
    };

    // The broker session is an external collaborator; this binary replays
    // recorded batches through the same interface.
    let replay_dir = std::env::var("MOVEMENTS_REPLAY_DIR")
        .expect("MOVEMENTS_REPLAY_DIR must point at a directory of batch files");
    let mut session = MockFeedSession::from_dir(&replay_dir).expect("Failed to load replay batches");
    println!("Replaying {} batches from {replay_dir}", session.remaining());

    let mut processor = MessageProcessor::new(Arc::new(locations), Arc::new(companies), io::stdout());

    info!(topic = %config.topic(), "listening for train movements");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!("Quitting.");
                break;
            }
            batch = session.next_batch() => match batch {
                Ok(Some(batch)) => {
                    let outcome = processor.process_batch(&batch);
                    info!(
                        rendered = outcome.rendered,
                        skipped_header = outcome.skipped_header,
                        failed_validation = outcome.failed_validation,
                        "processed batch"
                    );
                }
                Ok(None) => {
                    info!("feed exhausted");
                    break;
                }
                Err(e) => {
                    error!(error = %e, "feed session failed");
                    break;
                }
            }
        }
    }
}
