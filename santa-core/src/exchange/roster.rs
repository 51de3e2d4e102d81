//! Eligibility roster administration.

use super::{Clock, ExchangeError, GiftExchange};
use crate::config::{RegistryConfig, normalize_external_id};
use crate::entities::eligible_student::{EligibleStudent, EligibleStudentInsert, ListEligibleStudents};
use crate::store::ExchangeStore;
use kanau::processor::Processor;
use tracing::{info, warn};

/// Import roster entries as one atomic unit.
///
/// Each external id is normalized and checked against `registry`; ids that
/// fail, and entries with a blank name, are counted as invalid and left
/// out.
#[derive(Debug, Clone)]
pub struct ImportEligible {
    pub records: Vec<EligibleStudentInsert>,
    pub update_existing: bool,
    pub registry: RegistryConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub created: u64,
    pub updated: u64,
    pub skipped: u64,
    pub invalid: u64,
}

impl<S: ExchangeStore, C: Clock> Processor<ImportEligible> for GiftExchange<S, C> {
    type Output = ImportSummary;
    type Error = ExchangeError;
    #[tracing::instrument(skip_all, err, name = "Exchange:ImportEligible")]
    async fn process(&self, cmd: ImportEligible) -> Result<ImportSummary, ExchangeError> {
        let mut invalid = 0u64;
        let mut accepted = Vec::with_capacity(cmd.records.len());
        for record in cmd.records {
            let external_id = normalize_external_id(&record.external_id);
            let display_name = record.display_name.trim().to_string();
            if !cmd.registry.accepts(&external_id) || display_name.is_empty() {
                warn!(external_id = %external_id, "Invalid roster entry skipped");
                invalid += 1;
                continue;
            }
            accepted.push(EligibleStudentInsert {
                external_id,
                display_name,
            });
        }

        let counts = self
            .store
            .import_eligible(accepted, cmd.update_existing)
            .await?;
        let summary = ImportSummary {
            created: counts.created,
            updated: counts.updated,
            skipped: counts.skipped,
            invalid,
        };
        info!(
            created = summary.created,
            updated = summary.updated,
            skipped = summary.skipped,
            invalid = summary.invalid,
            "Roster imported"
        );
        Ok(summary)
    }
}

#[derive(Debug, Clone)]
pub struct FindEligible {
    pub external_id: String,
}

impl<S: ExchangeStore, C: Clock> Processor<FindEligible> for GiftExchange<S, C> {
    type Output = Option<EligibleStudent>;
    type Error = ExchangeError;
    #[tracing::instrument(skip_all, err, name = "Exchange:FindEligible")]
    async fn process(&self, query: FindEligible) -> Result<Option<EligibleStudent>, ExchangeError> {
        let external_id = normalize_external_id(&query.external_id);
        Ok(self.store.find_eligible(&external_id).await?)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListEligible {
    pub registered: Option<bool>,
    pub limit: i64,
    pub offset: i64,
}

impl<S: ExchangeStore, C: Clock> Processor<ListEligible> for GiftExchange<S, C> {
    type Output = Vec<EligibleStudent>;
    type Error = ExchangeError;
    #[tracing::instrument(skip_all, err, name = "Exchange:ListEligible")]
    async fn process(&self, query: ListEligible) -> Result<Vec<EligibleStudent>, ExchangeError> {
        Ok(self
            .store
            .list_eligible(ListEligibleStudents {
                registered: query.registered,
                limit: query.limit,
                offset: query.offset,
            })
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use regex::Regex;

    fn record(external_id: &str, display_name: &str) -> EligibleStudentInsert {
        EligibleStudentInsert {
            external_id: external_id.to_string(),
            display_name: display_name.to_string(),
        }
    }

    fn ict_registry() -> RegistryConfig {
        RegistryConfig::new(Some(Regex::new(r"^UG(20|22)ICT\d{4}$").unwrap()))
    }

    #[tokio::test]
    async fn test_import_validates_and_counts() {
        let exchange = GiftExchange::new(MemoryStore::new());
        let summary = exchange
            .process(ImportEligible {
                records: vec![
                    record(" ug22ict0001 ", " Ama Mensah "),
                    record("UG20ICT0002", "Kofi Boateng"),
                    record("UG21ICT0003", "Wrong Year"),
                    record("UG22ICT0004", "   "),
                    record("ug22ict0001", "Ama Duplicate"),
                ],
                update_existing: false,
                registry: ict_registry(),
            })
            .await
            .unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                created: 2,
                updated: 0,
                skipped: 1,
                invalid: 2,
            }
        );

        let found = exchange
            .process(FindEligible {
                external_id: "ug22ict0001".to_string(),
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.display_name, "Ama Mensah");
        assert!(!found.is_registered);
    }

    #[tokio::test]
    async fn test_import_updates_names() {
        let exchange = GiftExchange::new(MemoryStore::new());
        let import = |name: &str, update_existing| ImportEligible {
            records: vec![record("UG22ICT0001", name)],
            update_existing,
            registry: RegistryConfig::default(),
        };
        exchange.process(import("Ama Mensah", false)).await.unwrap();
        let summary = exchange.process(import("Ama K. Mensah", true)).await.unwrap();
        assert_eq!(summary.updated, 1);

        let listed = exchange
            .process(ListEligible {
                registered: Some(false),
                limit: 10,
                offset: 0,
            })
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].display_name, "Ama K. Mensah");
        let registered = exchange
            .process(ListEligible {
                registered: Some(true),
                limit: 10,
                offset: 0,
            })
            .await
            .unwrap();
        assert!(registered.is_empty());
    }
}
