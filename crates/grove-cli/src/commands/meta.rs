//! `grove meta` command implementation.
//!
//! Reads and edits the metadata a package keeps in the storage directory.

use super::CommandContext;
use crate::MetaAction;
use grove_config::PackageMetadata;
use grove_core::error::GroveResult;

/// Execute the `grove meta` command
pub fn execute(package: &str, action: MetaAction, ctx: &CommandContext) -> GroveResult<()> {
    let storage = ctx.config.storage_path();
    let mut metadata = PackageMetadata::new(package);
    metadata.load(&storage)?;

    match action {
        MetaAction::Get { key } => match metadata.get(&key) {
            Some(value) => ctx.output.data(value),
            None => ctx.output.warn(&format!("{} has no value for '{}'", package, key)),
        },
        MetaAction::Set { key, value } => {
            metadata.set(key.as_str(), value);
            save(&mut metadata, ctx)?;
        },
        MetaAction::Remove { key } => {
            if metadata.remove(&key) {
                save(&mut metadata, ctx)?;
            } else {
                ctx.output.info(&format!("{} has no value for '{}'", package, key));
            }
        },
        MetaAction::List => {
            for (key, value) in metadata.iter() {
                ctx.output.data(&format!("{} = {}", key, value));
            }
        },
    }

    Ok(())
}

fn save(metadata: &mut PackageMetadata, ctx: &CommandContext) -> GroveResult<()> {
    if !metadata.is_modified() {
        return Ok(());
    }
    metadata.save(&ctx.config.storage_path())?;
    ctx.output.success(&format!("Saved metadata for {}", metadata.package()));
    Ok(())
}
