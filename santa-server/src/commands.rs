//! One-shot operator commands run instead of the HTTP server.

use anyhow::Context;
use kanau::processor::Processor;
use santa_core::config::RegistryConfig;
use santa_core::entities::eligible_student::EligibleStudentInsert;
use santa_core::exchange::{
    GenerateAssignments, GetEvent, GiftExchange, ImportEligible, ImportSummary,
};
use santa_core::store::ExchangeStore;
use santa_sdk::objects::admin::EligibleRecordInput;
use std::path::Path;

/// Read a roster file: a JSON array of `{"external_id", "display_name"}`.
pub fn read_roster(path: &Path) -> anyhow::Result<Vec<EligibleStudentInsert>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read roster file {}", path.display()))?;
    let records: Vec<EligibleRecordInput> = serde_json::from_str(&content)
        .with_context(|| format!("roster file {} is not a JSON record list", path.display()))?;
    Ok(records
        .into_iter()
        .map(|r| EligibleStudentInsert {
            external_id: r.external_id,
            display_name: r.display_name,
        })
        .collect())
}

pub async fn import_roster<S: ExchangeStore>(
    exchange: &GiftExchange<S>,
    registry: RegistryConfig,
    path: &Path,
    update_existing: bool,
) -> anyhow::Result<ImportSummary> {
    let records = read_roster(path)?;
    Ok(exchange
        .process(ImportEligible {
            records,
            update_existing,
            registry,
        })
        .await?)
}

/// Returns the event name and the number of participants assigned.
pub async fn generate_assignments<S: ExchangeStore>(
    exchange: &GiftExchange<S>,
    event_id: i64,
) -> anyhow::Result<(String, u64)> {
    let event = exchange.process(GetEvent { event_id }).await?;
    let outcome = exchange.process(GenerateAssignments { event_id }).await?;
    tracing::info!(
        event_id,
        event = %event.name,
        assigned = outcome.assigned,
        attempts = outcome.attempts,
        "Assignments generated"
    );
    Ok((event.name, outcome.assigned))
}
