//! Collections command - named article groupings

use anyhow::{Context, Result};
use devpulse_domain::model::Collection;
use devpulse_domain::ports::{Clock, SystemClock, UserStateStore};
use std::path::PathBuf;
use uuid::Uuid;

use crate::args::{CollectionsArgs, CollectionsCommands};
use crate::commands::open_store;
use crate::config::AppConfig;

pub async fn execute(args: CollectionsArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let store = open_store(&config).await?;

    match args.command {
        CollectionsCommands::List { json } => {
            let collections = store.collections().await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&collections)?);
            } else if collections.is_empty() {
                println!("No collections.");
            } else {
                for collection in &collections {
                    println!(
                        "{}  {} ({} article(s))",
                        collection.id,
                        collection.name,
                        collection.article_ids.len()
                    );
                    if !collection.description.is_empty() {
                        println!("    {}", collection.description);
                    }
                }
            }
        }
        CollectionsCommands::Create {
            name,
            description,
            color,
        } => {
            let collection = Collection {
                id: Uuid::new_v4(),
                name: name.clone(),
                description,
                color,
                created_at: SystemClock.now(),
                article_ids: vec![],
            };
            store.save_collection(&collection).await?;
            println!("Created collection {} ({})", name, collection.id);
        }
        CollectionsCommands::Delete { id } => {
            let id = parse_collection_id(&id)?;
            store.delete_collection(id).await?;
            println!("Deleted collection {}", id);
        }
        CollectionsCommands::Add { id, article_id } => {
            let id = parse_collection_id(&id)?;
            store.add_to_collection(id, &article_id).await?;
            println!("Added {} to collection {}", article_id, id);
        }
        CollectionsCommands::Remove { id, article_id } => {
            let id = parse_collection_id(&id)?;
            store.remove_from_collection(id, &article_id).await?;
            println!("Removed {} from collection {}", article_id, id);
        }
    }

    Ok(())
}

fn parse_collection_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).with_context(|| format!("Invalid collection id: {}", id))
}
