//! In-process store.
//!
//! Mirrors the locking of [`super::PgStore`] with keyed `RwLock`s: one per
//! event (shared or exclusive), one per roster external id and one per
//! participant (exclusive). Writes made through a scope are staged and
//! applied in one step at commit, after the unique constraints have been
//! checked against the committed rows.

use super::{
    ELIGIBLE_RECORD_KEY, EligibilityRegistry, EventScope, ExchangeStore, ImportCounts,
    PARTICIPANT_EXTERNAL_ID_KEY, REVEAL_TOKEN_KEY, StoreError,
};
use crate::entities::eligible_student::{EligibleStudent, EligibleStudentInsert, ListEligibleStudents};
use crate::entities::event::{Event, EventInsert, UpdateEventSchedule};
use crate::entities::participant::{ListParticipants, Participant, ParticipantInsert, ParticipantListing};
use crate::framework::LockMode;
use santa_sdk::objects::admin::ParticipantStatusFilter;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::{Mutex, OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock};

struct LockTable<K> {
    locks: Mutex<HashMap<K, Arc<RwLock<()>>>>,
}

impl<K: Eq + Hash> LockTable<K> {
    fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// The lock for `key`. Entries nobody holds or waits on are dropped
    /// first, so the table only tracks keys in use.
    async fn entry(&self, key: K) -> Arc<RwLock<()>> {
        let mut locks = self.locks.lock().await;
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks.entry(key).or_default().clone()
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }

    async fn read(&self, key: K) -> OwnedRwLockReadGuard<()> {
        self.entry(key).await.read_owned().await
    }

    async fn write(&self, key: K) -> OwnedRwLockWriteGuard<()> {
        self.entry(key).await.write_owned().await
    }
}

#[derive(Default)]
struct Tables {
    events: BTreeMap<i64, Event>,
    participants: BTreeMap<i64, Participant>,
    eligible: BTreeMap<i64, EligibleStudent>,
    last_event_id: i64,
    last_participant_id: i64,
    last_eligible_id: i64,
}

impl Tables {
    fn eligible_by_external_id(&self, external_id: &str) -> Option<&EligibleStudent> {
        self.eligible
            .values()
            .find(|student| student.external_id == external_id)
    }

    /// The first unique constraint `candidate` would violate.
    fn violated_constraint(&self, candidate: &Participant) -> Option<&'static str> {
        self.participants.values().find_map(|existing| {
            if existing.event_id == candidate.event_id
                && existing.external_id == candidate.external_id
            {
                Some(PARTICIPANT_EXTERNAL_ID_KEY)
            } else if existing.reveal_token == candidate.reveal_token {
                Some(REVEAL_TOKEN_KEY)
            } else if existing.eligible_record_id == candidate.eligible_record_id {
                Some(ELIGIBLE_RECORD_KEY)
            } else {
                None
            }
        })
    }
}

struct Inner {
    tables: Mutex<Tables>,
    event_locks: LockTable<i64>,
    eligible_locks: LockTable<String>,
    participant_locks: LockTable<i64>,
}

/// Store kept entirely in memory. Cloning shares the same data.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                tables: Mutex::new(Tables::default()),
                event_locks: LockTable::new(),
                eligible_locks: LockTable::new(),
                participant_locks: LockTable::new(),
            }),
        }
    }
}

/// Held until the scope drops.
enum EventGuard {
    Shared { _guard: OwnedRwLockReadGuard<()> },
    Exclusive { _guard: OwnedRwLockWriteGuard<()> },
}

#[derive(Debug, Clone)]
enum StagedWrite {
    RegistrationOpen(bool),
    RevealOpen(bool),
    InsertParticipant(Participant),
    Assign { giver_id: i64, recipient_id: i64 },
    ClearAssignments,
    MarkRevealed(i64),
    MarkRegistered(i64),
}

pub struct MemoryEventScope {
    inner: Arc<Inner>,
    event: Event,
    _event_guard: EventGuard,
    row_guards: Vec<OwnedRwLockWriteGuard<()>>,
    staged: Vec<StagedWrite>,
}

impl MemoryEventScope {
    /// A committed participant row as this scope sees it.
    fn view(&self, mut participant: Participant) -> Participant {
        for write in &self.staged {
            match write {
                StagedWrite::Assign {
                    giver_id,
                    recipient_id,
                } if *giver_id == participant.id => {
                    participant.assigned_to_id = Some(*recipient_id);
                }
                StagedWrite::ClearAssignments if participant.event_id == self.event.id => {
                    participant.assigned_to_id = None;
                    participant.has_revealed = false;
                }
                StagedWrite::MarkRevealed(id) if *id == participant.id => {
                    participant.has_revealed = true;
                }
                _ => {}
            }
        }
        participant
    }

    fn staged_inserts(&self) -> impl Iterator<Item = &Participant> {
        self.staged.iter().filter_map(|write| match write {
            StagedWrite::InsertParticipant(participant) => Some(participant),
            _ => None,
        })
    }

    async fn visible_participants(&self) -> Vec<Participant> {
        let committed: Vec<Participant> = {
            let tables = self.inner.tables.lock().await;
            tables
                .participants
                .values()
                .filter(|p| p.event_id == self.event.id)
                .cloned()
                .collect()
        };
        let mut visible: Vec<Participant> = committed
            .into_iter()
            .chain(self.staged_inserts().cloned())
            .map(|p| self.view(p))
            .collect();
        visible.sort_by_key(|p| p.id);
        visible
    }

    async fn visible_participant(&self, participant_id: i64) -> Option<Participant> {
        let committed = self
            .inner
            .tables
            .lock()
            .await
            .participants
            .get(&participant_id)
            .cloned();
        committed
            .or_else(|| {
                self.staged_inserts()
                    .find(|p| p.id == participant_id)
                    .cloned()
            })
            .filter(|p| p.event_id == self.event.id)
            .map(|p| self.view(p))
    }
}

impl EligibilityRegistry for MemoryEventScope {
    async fn lock_eligible(
        &mut self,
        external_id: &str,
    ) -> Result<Option<EligibleStudent>, StoreError> {
        let guard = self
            .inner
            .eligible_locks
            .write(external_id.to_string())
            .await;
        self.row_guards.push(guard);

        let tables = self.inner.tables.lock().await;
        let student = tables.eligible_by_external_id(external_id).cloned();
        Ok(student.map(|mut student| {
            if self
                .staged
                .iter()
                .any(|w| matches!(w, StagedWrite::MarkRegistered(id) if *id == student.id))
            {
                student.is_registered = true;
            }
            student
        }))
    }

    async fn mark_registered(&mut self, eligible_id: i64) -> Result<bool, StoreError> {
        let staged = self
            .staged
            .iter()
            .any(|w| matches!(w, StagedWrite::MarkRegistered(id) if *id == eligible_id));
        let committed = self
            .inner
            .tables
            .lock()
            .await
            .eligible
            .get(&eligible_id)
            .is_none_or(|student| student.is_registered);
        if staged || committed {
            return Ok(false);
        }
        self.staged.push(StagedWrite::MarkRegistered(eligible_id));
        Ok(true)
    }
}

impl EventScope for MemoryEventScope {
    fn event(&self) -> &Event {
        &self.event
    }

    async fn participants(&mut self) -> Result<Vec<Participant>, StoreError> {
        Ok(self.visible_participants().await)
    }

    async fn participant_exists(&mut self, external_id: &str) -> Result<bool, StoreError> {
        Ok(self
            .visible_participants()
            .await
            .iter()
            .any(|p| p.external_id == external_id))
    }

    async fn insert_participant(
        &mut self,
        insert: ParticipantInsert,
    ) -> Result<Participant, StoreError> {
        let participant = {
            let mut tables = self.inner.tables.lock().await;
            tables.last_participant_id += 1;
            let participant = Participant {
                id: tables.last_participant_id,
                event_id: insert.event_id,
                external_id: insert.external_id,
                display_name: insert.display_name,
                reveal_token: insert.reveal_token,
                assigned_to_id: None,
                has_revealed: false,
                eligible_record_id: insert.eligible_record_id,
                created_at: OffsetDateTime::now_utc(),
            };
            if let Some(constraint) = tables.violated_constraint(&participant) {
                return Err(StoreError::Duplicate {
                    constraint: constraint.to_string(),
                });
            }
            participant
        };
        self.staged
            .push(StagedWrite::InsertParticipant(participant.clone()));
        Ok(participant)
    }

    async fn lock_participant_by_credentials(
        &mut self,
        external_id: &str,
        reveal_token: &str,
    ) -> Result<Option<Participant>, StoreError> {
        let event_id = self.event.id;
        let matches = |p: &Participant| {
            p.event_id == event_id
                && p.external_id == external_id
                && p.reveal_token == reveal_token
        };
        let candidate = {
            let tables = self.inner.tables.lock().await;
            tables.participants.values().find(|p| matches(p)).map(|p| p.id)
        };
        let Some(participant_id) = candidate else {
            return Ok(None);
        };

        let guard = self.inner.participant_locks.write(participant_id).await;
        self.row_guards.push(guard);
        // Re-read under the row lock; a concurrent scope may have committed.
        Ok(self
            .visible_participant(participant_id)
            .await
            .filter(|p| matches(p)))
    }

    async fn participant(&mut self, participant_id: i64) -> Result<Option<Participant>, StoreError> {
        Ok(self.visible_participant(participant_id).await)
    }

    async fn assign(&mut self, pairs: &[(i64, i64)]) -> Result<u64, StoreError> {
        let members: Vec<i64> = self
            .visible_participants()
            .await
            .iter()
            .map(|p| p.id)
            .collect();
        let mut assigned = 0;
        for &(giver_id, recipient_id) in pairs {
            if members.contains(&giver_id) {
                self.staged.push(StagedWrite::Assign {
                    giver_id,
                    recipient_id,
                });
                assigned += 1;
            }
        }
        Ok(assigned)
    }

    async fn clear_assignments(&mut self) -> Result<u64, StoreError> {
        let cleared = self
            .visible_participants()
            .await
            .iter()
            .filter(|p| p.assigned_to_id.is_some() || p.has_revealed)
            .count() as u64;
        self.staged.push(StagedWrite::ClearAssignments);
        Ok(cleared)
    }

    async fn mark_revealed(&mut self, participant_id: i64) -> Result<bool, StoreError> {
        let Some(participant) = self.visible_participant(participant_id).await else {
            return Ok(false);
        };
        if participant.has_revealed {
            return Ok(false);
        }
        self.staged.push(StagedWrite::MarkRevealed(participant_id));
        Ok(true)
    }

    async fn set_registration_open(&mut self, open: bool) -> Result<(), StoreError> {
        self.staged.push(StagedWrite::RegistrationOpen(open));
        self.event.registration_open = open;
        Ok(())
    }

    async fn set_reveal_open(&mut self, open: bool) -> Result<(), StoreError> {
        self.staged.push(StagedWrite::RevealOpen(open));
        self.event.reveal_open = open;
        Ok(())
    }

    async fn commit(self) -> Result<(), StoreError> {
        let mut tables = self.inner.tables.lock().await;
        for participant in self.staged_inserts() {
            if let Some(constraint) = tables.violated_constraint(participant) {
                return Err(StoreError::Duplicate {
                    constraint: constraint.to_string(),
                });
            }
        }

        let event_id = self.event.id;
        for write in self.staged {
            match write {
                StagedWrite::RegistrationOpen(open) => {
                    if let Some(event) = tables.events.get_mut(&event_id) {
                        event.registration_open = open;
                    }
                }
                StagedWrite::RevealOpen(open) => {
                    if let Some(event) = tables.events.get_mut(&event_id) {
                        event.reveal_open = open;
                    }
                }
                StagedWrite::InsertParticipant(participant) => {
                    tables.participants.insert(participant.id, participant);
                }
                StagedWrite::Assign {
                    giver_id,
                    recipient_id,
                } => {
                    if let Some(giver) = tables.participants.get_mut(&giver_id) {
                        giver.assigned_to_id = Some(recipient_id);
                    }
                }
                StagedWrite::ClearAssignments => {
                    for participant in tables.participants.values_mut() {
                        if participant.event_id == event_id {
                            participant.assigned_to_id = None;
                            participant.has_revealed = false;
                        }
                    }
                }
                StagedWrite::MarkRevealed(participant_id) => {
                    if let Some(participant) = tables.participants.get_mut(&participant_id) {
                        participant.has_revealed = true;
                    }
                }
                StagedWrite::MarkRegistered(eligible_id) => {
                    if let Some(student) = tables.eligible.get_mut(&eligible_id) {
                        student.is_registered = true;
                    }
                }
            }
        }
        Ok(())
    }
}

fn paginate<T>(rows: Vec<T>, limit: i64, offset: i64) -> Vec<T> {
    let offset = usize::try_from(offset).unwrap_or(0);
    let limit = usize::try_from(limit).unwrap_or(0);
    rows.into_iter().skip(offset).take(limit).collect()
}

impl ExchangeStore for MemoryStore {
    type Scope = MemoryEventScope;

    async fn begin(
        &self,
        event_id: i64,
        mode: LockMode,
    ) -> Result<Option<MemoryEventScope>, StoreError> {
        let guard = match mode {
            LockMode::Shared => EventGuard::Shared {
                _guard: self.inner.event_locks.read(event_id).await,
            },
            LockMode::Exclusive => EventGuard::Exclusive {
                _guard: self.inner.event_locks.write(event_id).await,
            },
        };
        let event = self.inner.tables.lock().await.events.get(&event_id).cloned();
        Ok(event.map(|event| MemoryEventScope {
            inner: self.inner.clone(),
            event,
            _event_guard: guard,
            row_guards: Vec::new(),
            staged: Vec::new(),
        }))
    }

    async fn create_event(&self, insert: EventInsert) -> Result<Event, StoreError> {
        let mut tables = self.inner.tables.lock().await;
        tables.last_event_id += 1;
        let event = Event {
            id: tables.last_event_id,
            name: insert.name,
            registration_open: true,
            reveal_open: false,
            countdown_at: insert.countdown_at,
            reveal_at: insert.reveal_at,
            created_at: OffsetDateTime::now_utc(),
        };
        tables.events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn get_event(&self, event_id: i64) -> Result<Option<Event>, StoreError> {
        Ok(self.inner.tables.lock().await.events.get(&event_id).cloned())
    }

    async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
        let mut events: Vec<Event> = self
            .inner
            .tables
            .lock()
            .await
            .events
            .values()
            .cloned()
            .collect();
        events.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(events)
    }

    async fn update_schedule(
        &self,
        update: UpdateEventSchedule,
    ) -> Result<Option<Event>, StoreError> {
        let _guard = self.inner.event_locks.write(update.event_id).await;
        let mut tables = self.inner.tables.lock().await;
        Ok(tables.events.get_mut(&update.event_id).map(|event| {
            event.countdown_at = update.countdown_at;
            event.reveal_at = update.reveal_at;
            event.clone()
        }))
    }

    async fn delete_event(&self, event_id: i64) -> Result<bool, StoreError> {
        let _guard = self.inner.event_locks.write(event_id).await;
        let mut tables = self.inner.tables.lock().await;
        if tables.events.remove(&event_id).is_none() {
            return Ok(false);
        }
        tables.participants.retain(|_, p| p.event_id != event_id);
        let Tables { participants, .. } = &mut *tables;
        let remaining: Vec<i64> = participants.keys().copied().collect();
        for participant in participants.values_mut() {
            if participant
                .assigned_to_id
                .is_some_and(|id| !remaining.contains(&id))
            {
                participant.assigned_to_id = None;
            }
        }
        Ok(true)
    }

    async fn participants_of_event(&self, event_id: i64) -> Result<Vec<Participant>, StoreError> {
        let tables = self.inner.tables.lock().await;
        Ok(tables
            .participants
            .values()
            .filter(|p| p.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn list_participants(
        &self,
        query: ListParticipants,
    ) -> Result<Vec<ParticipantListing>, StoreError> {
        let tables = self.inner.tables.lock().await;
        let mut rows: Vec<ParticipantListing> = tables
            .participants
            .values()
            .filter(|p| p.event_id == query.event_id)
            .filter(|p| match query.status {
                ParticipantStatusFilter::All => true,
                ParticipantStatusFilter::Revealed => p.has_revealed,
                ParticipantStatusFilter::Pending => !p.has_revealed,
            })
            .map(|p| ParticipantListing {
                id: p.id,
                external_id: p.external_id.clone(),
                display_name: p.display_name.clone(),
                has_revealed: p.has_revealed,
                assigned_to_name: p
                    .assigned_to_id
                    .and_then(|id| tables.participants.get(&id))
                    .map(|r| r.display_name.clone()),
                created_at: p.created_at,
            })
            .collect();
        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(paginate(rows, query.limit, query.offset))
    }

    async fn find_eligible(&self, external_id: &str) -> Result<Option<EligibleStudent>, StoreError> {
        let tables = self.inner.tables.lock().await;
        Ok(tables.eligible_by_external_id(external_id).cloned())
    }

    async fn list_eligible(
        &self,
        query: ListEligibleStudents,
    ) -> Result<Vec<EligibleStudent>, StoreError> {
        let tables = self.inner.tables.lock().await;
        let mut rows: Vec<EligibleStudent> = tables
            .eligible
            .values()
            .filter(|s| query.registered.is_none_or(|r| s.is_registered == r))
            .cloned()
            .collect();
        rows.sort_by(|a, b| (&a.display_name, a.id).cmp(&(&b.display_name, b.id)));
        Ok(paginate(rows, query.limit, query.offset))
    }

    async fn import_eligible(
        &self,
        records: Vec<EligibleStudentInsert>,
        update_existing: bool,
    ) -> Result<ImportCounts, StoreError> {
        let mut tables = self.inner.tables.lock().await;
        let mut counts = ImportCounts::default();
        for record in records {
            let existing = tables
                .eligible_by_external_id(&record.external_id)
                .map(|s| s.id);
            match existing {
                None => {
                    tables.last_eligible_id += 1;
                    let id = tables.last_eligible_id;
                    tables.eligible.insert(
                        id,
                        EligibleStudent {
                            id,
                            external_id: record.external_id,
                            display_name: record.display_name,
                            is_registered: false,
                        },
                    );
                    counts.created += 1;
                }
                Some(id) if update_existing => {
                    if let Some(student) = tables.eligible.get_mut(&id) {
                        student.display_name = record.display_name;
                    }
                    counts.updated += 1;
                }
                Some(_) => counts.skipped += 1,
            }
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn seeded() -> (MemoryStore, Event) {
        let store = MemoryStore::new();
        let event = store
            .create_event(EventInsert {
                name: "Winter Exchange".to_string(),
                countdown_at: None,
                reveal_at: None,
            })
            .await
            .unwrap();
        store
            .import_eligible(
                vec![
                    EligibleStudentInsert {
                        external_id: "UG22ICT0001".to_string(),
                        display_name: "Ama Mensah".to_string(),
                    },
                    EligibleStudentInsert {
                        external_id: "UG22ICT0002".to_string(),
                        display_name: "Kofi Boateng".to_string(),
                    },
                ],
                false,
            )
            .await
            .unwrap();
        (store, event)
    }

    fn insert(event_id: i64, external_id: &str, token: &str, eligible_id: i64) -> ParticipantInsert {
        ParticipantInsert {
            event_id,
            external_id: external_id.to_string(),
            display_name: external_id.to_lowercase(),
            reveal_token: token.to_string(),
            eligible_record_id: eligible_id,
        }
    }

    #[tokio::test]
    async fn test_dropped_scope_discards_writes() {
        let (store, event) = seeded().await;
        let mut scope = store.begin(event.id, LockMode::Exclusive).await.unwrap().unwrap();
        scope.set_registration_open(false).await.unwrap();
        assert!(!scope.event().registration_open);
        drop(scope);

        let reloaded = store.get_event(event.id).await.unwrap().unwrap();
        assert!(reloaded.registration_open);
    }

    #[tokio::test]
    async fn test_scope_reads_its_own_writes() {
        let (store, event) = seeded().await;
        let mut scope = store.begin(event.id, LockMode::Shared).await.unwrap().unwrap();
        let created = scope
            .insert_participant(insert(event.id, "UG22ICT0001", "TOKEN0000000001", 1))
            .await
            .unwrap();
        assert!(scope.participant_exists("UG22ICT0001").await.unwrap());
        assert!(scope.mark_registered(1).await.unwrap());
        assert!(!scope.mark_registered(1).await.unwrap());
        let student = scope.lock_eligible("UG22ICT0001").await.unwrap().unwrap();
        assert!(student.is_registered);

        assert!(store.participants_of_event(event.id).await.unwrap().is_empty());
        scope.commit().await.unwrap();

        let committed = store.participants_of_event(event.id).await.unwrap();
        assert_eq!(committed, vec![created]);
        let student = store.find_eligible("UG22ICT0001").await.unwrap().unwrap();
        assert!(student.is_registered);
    }

    #[tokio::test]
    async fn test_commit_rejects_duplicate_token() {
        let (store, event) = seeded().await;
        let mut first = store.begin(event.id, LockMode::Shared).await.unwrap().unwrap();
        let mut second = store.begin(event.id, LockMode::Shared).await.unwrap().unwrap();
        first
            .insert_participant(insert(event.id, "UG22ICT0001", "SAMETOKEN000000", 1))
            .await
            .unwrap();
        second
            .insert_participant(insert(event.id, "UG22ICT0002", "SAMETOKEN000000", 2))
            .await
            .unwrap();
        first.commit().await.unwrap();

        let err = second.commit().await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Duplicate { ref constraint } if constraint == REVEAL_TOKEN_KEY
        ));
        assert_eq!(store.participants_of_event(event.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_exclusive_scope_waits_for_shared_scope() {
        let (store, event) = seeded().await;
        let shared = store.begin(event.id, LockMode::Shared).await.unwrap().unwrap();

        let blocked = tokio::time::timeout(
            Duration::from_millis(50),
            store.begin(event.id, LockMode::Exclusive),
        )
        .await;
        assert!(blocked.is_err());

        let other = store
            .create_event(EventInsert {
                name: "Other".to_string(),
                countdown_at: None,
                reveal_at: None,
            })
            .await
            .unwrap();
        let unrelated = tokio::time::timeout(
            Duration::from_millis(50),
            store.begin(other.id, LockMode::Exclusive),
        )
        .await;
        assert!(unrelated.is_ok());

        drop(shared);
        let scope = store.begin(event.id, LockMode::Exclusive).await.unwrap();
        assert!(scope.is_some());
    }

    #[tokio::test]
    async fn test_released_row_locks_are_forgotten() {
        let (store, event) = seeded().await;
        for i in 0..50 {
            let mut scope = store.begin(event.id, LockMode::Shared).await.unwrap().unwrap();
            let unknown = format!("NOBODY{i:04}");
            assert!(scope.lock_eligible(&unknown).await.unwrap().is_none());
        }

        let mut scope = store.begin(event.id, LockMode::Shared).await.unwrap().unwrap();
        assert!(scope.lock_eligible("UG22ICT0001").await.unwrap().is_some());
        // Only the row held by the open scope is still tracked.
        assert_eq!(store.inner.eligible_locks.len().await, 1);
        drop(scope);
        assert!(store.inner.event_locks.len().await <= 1);
    }

    #[tokio::test]
    async fn test_delete_event_cascades() {
        let (store, event) = seeded().await;
        let mut scope = store.begin(event.id, LockMode::Shared).await.unwrap().unwrap();
        scope
            .insert_participant(insert(event.id, "UG22ICT0001", "TOKEN0000000001", 1))
            .await
            .unwrap();
        scope.commit().await.unwrap();

        assert!(store.delete_event(event.id).await.unwrap());
        assert!(!store.delete_event(event.id).await.unwrap());
        assert!(store.participants_of_event(event.id).await.unwrap().is_empty());
        assert!(store.begin(event.id, LockMode::Shared).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_import_counts() {
        let (store, _) = seeded().await;
        let records = vec![
            EligibleStudentInsert {
                external_id: "UG22ICT0001".to_string(),
                display_name: "Ama K. Mensah".to_string(),
            },
            EligibleStudentInsert {
                external_id: "UG22ICT0003".to_string(),
                display_name: "Efua Owusu".to_string(),
            },
        ];
        let counts = store.import_eligible(records.clone(), false).await.unwrap();
        assert_eq!(
            counts,
            ImportCounts {
                created: 1,
                updated: 0,
                skipped: 1
            }
        );
        let counts = store.import_eligible(records, true).await.unwrap();
        assert_eq!(counts.updated, 2);
        let student = store.find_eligible("UG22ICT0001").await.unwrap().unwrap();
        assert_eq!(student.display_name, "Ama K. Mensah");
    }
}
