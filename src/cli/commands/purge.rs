use crate::config::Config;
use crate::domain::ResourceKind;
use crate::state::SharedState;

pub async fn cmd_purge(config: Config, kind: ResourceKind, location_id: i32) -> anyhow::Result<()> {
    let state = SharedState::new(config).await?;
    let purged = state.resources.invalidate(kind, location_id).await?;

    if purged == 0 {
        println!("No cached {kind} rows for location {location_id}.");
    } else {
        println!("✓ Purged {purged} cached {kind} row(s) for location {location_id}");
    }

    Ok(())
}
