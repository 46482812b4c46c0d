use crate::config::Config;
use crate::domain::ResourceKind;
use crate::freshness;
use crate::services::ResourceTarget;
use crate::state::SharedState;

pub async fn cmd_fetch(
    config: Config,
    kind: ResourceKind,
    location_id: i32,
    query: Option<String>,
) -> anyhow::Result<()> {
    let state = SharedState::new(config).await?;

    let target = ResourceTarget {
        search_query: query,
        ..ResourceTarget::location(location_id)
    };

    let fetched = match state.resources.fetch(kind, &target).await {
        Ok(fetched) => fetched,
        Err(e) => {
            println!("Failed to fetch {kind} for location {location_id}: {e}");
            return Ok(());
        }
    };

    println!(
        "{} record(s) for location {} [{}]",
        fetched.records.len(),
        location_id,
        fetched.status.header_value()
    );

    if let Some(first) = fetched.records.first() {
        println!(
            "Fresh until: {}",
            freshness::expires_at(kind, first.created_at).to_rfc3339()
        );
    }

    if let Some(report) = fetched.persisted.filter(|r| !r.is_complete()) {
        println!(
            "⚠ {} of {} record(s) could not be cached",
            report.failed,
            report.attempted()
        );
    }

    println!("{:-<60}", "");
    println!("{}", serde_json::to_string_pretty(&fetched.records)?);

    Ok(())
}
