//! Mark command - read/bookmark state updates

use anyhow::Result;
use devpulse_domain::model::ReadEntry;
use devpulse_domain::ports::{Clock, SystemClock, UserStateStore};
use std::path::PathBuf;

use crate::args::{MarkArgs, MarkCommands};
use crate::commands::open_store;
use crate::config::AppConfig;

pub async fn execute(args: MarkArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let store = open_store(&config).await?;

    match args.command {
        MarkCommands::Read { article_id, url } => {
            let entry = ReadEntry {
                article_id: article_id.clone(),
                read_at: SystemClock.now(),
                url,
            };
            store.mark_read(&entry).await?;
            println!("Marked read: {}", article_id);
        }
        MarkCommands::Bookmark { article_id } => {
            store.add_bookmark(&article_id).await?;
            println!("Bookmarked: {}", article_id);
        }
        MarkCommands::Unbookmark { article_id } => {
            store.remove_bookmark(&article_id).await?;
            println!("Removed bookmark: {}", article_id);
        }
    }

    Ok(())
}
