use kanau::processor::Processor;
use santa_core::config::RegistryConfig;
use santa_core::entities::eligible_student::EligibleStudentInsert;
use santa_core::entities::participant::Participant;
use santa_core::exchange::{
    CloseRegistration, CreateEvent, ExchangeError, FindEligible, GenerateAssignments,
    GetStatistics, GiftExchange, ImportEligible, ManualClock, OpenReveal, Register,
    ResetAssignments, RevealAssignment,
};
use santa_core::store::{ExchangeStore, MemoryStore};
use std::collections::HashMap;
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

type Exchange = GiftExchange<MemoryStore, ManualClock>;

const NOW: OffsetDateTime = datetime!(2025-12-01 09:00 UTC);

async fn exchange_with_roster(roster: &[(&str, &str)]) -> (Exchange, ManualClock) {
    let clock = ManualClock::new(NOW);
    let exchange = GiftExchange::new(MemoryStore::new()).with_clock(clock.clone());
    exchange
        .process(ImportEligible {
            records: roster
                .iter()
                .map(|(external_id, display_name)| EligibleStudentInsert {
                    external_id: external_id.to_string(),
                    display_name: display_name.to_string(),
                })
                .collect(),
            update_existing: false,
            registry: RegistryConfig::default(),
        })
        .await
        .unwrap();
    (exchange, clock)
}

async fn create_event(exchange: &Exchange, reveal_at: Option<OffsetDateTime>) -> i64 {
    exchange
        .process(CreateEvent {
            name: "Winter Exchange".to_string(),
            countdown_at: None,
            reveal_at,
        })
        .await
        .unwrap()
        .id
}

async fn register(exchange: &Exchange, event_id: i64, external_id: &str) -> Participant {
    exchange
        .process(Register {
            event_id,
            display_name: String::new(),
            external_id: external_id.to_string(),
        })
        .await
        .unwrap()
}

fn reveal(event_id: i64, participant: &Participant) -> RevealAssignment {
    RevealAssignment {
        event_id,
        external_id: participant.external_id.clone(),
        token: participant.reveal_token.clone(),
    }
}

const ABC: [(&str, &str); 3] = [
    ("UG22ICT0001", "Ama Mensah"),
    ("UG22ICT0002", "Kofi Boateng"),
    ("UG22ICT0003", "Efua Owusu"),
];

#[tokio::test]
async fn test_full_exchange_with_reveal_lock() {
    let (exchange, clock) = exchange_with_roster(&ABC).await;
    let reveal_at = NOW + Duration::days(20);
    let event_id = create_event(&exchange, Some(reveal_at)).await;

    let a = register(&exchange, event_id, "UG22ICT0001").await;
    let b = register(&exchange, event_id, "UG22ICT0002").await;
    let c = register(&exchange, event_id, "UG22ICT0003").await;
    exchange
        .process(CloseRegistration { event_id })
        .await
        .unwrap();
    let outcome = exchange
        .process(GenerateAssignments { event_id })
        .await
        .unwrap();
    assert_eq!(outcome.assigned, 3);

    let participants = exchange
        .store()
        .participants_of_event(event_id)
        .await
        .unwrap();
    let names: HashMap<i64, String> = participants
        .iter()
        .map(|p| (p.id, p.display_name.clone()))
        .collect();
    let assigned: HashMap<i64, i64> = participants
        .iter()
        .map(|p| (p.id, p.assigned_to_id.unwrap()))
        .collect();
    for (giver, recipient) in &assigned {
        assert_ne!(giver, recipient);
    }
    let mut recipients: Vec<i64> = assigned.values().copied().collect();
    recipients.sort_unstable();
    let mut ids = vec![a.id, b.id, c.id];
    ids.sort_unstable();
    assert_eq!(recipients, ids);

    exchange.process(OpenReveal { event_id }).await.unwrap();

    let err = exchange.process(reveal(event_id, &a)).await.unwrap_err();
    assert!(matches!(err, ExchangeError::RevealLocked { until } if until == reveal_at));

    clock.set(reveal_at);
    let revealed = exchange.process(reveal(event_id, &a)).await.unwrap();
    assert_eq!(revealed.display_name, names[&assigned[&a.id]]);

    let a_now = exchange
        .store()
        .participants_of_event(event_id)
        .await
        .unwrap()
        .into_iter()
        .find(|p| p.id == a.id)
        .unwrap();
    assert!(a_now.has_revealed);

    let stats = exchange
        .process(GetStatistics { event_id })
        .await
        .unwrap();
    assert_eq!((stats.total, stats.revealed, stats.pending), (3, 1, 2));
    assert_eq!(stats.revealed_percent, 33);
    assert_eq!(stats.pending_percent, 67);
}

#[tokio::test]
async fn test_generate_twice_leaves_assignments_untouched() {
    let (exchange, _) = exchange_with_roster(&ABC).await;
    let event_id = create_event(&exchange, None).await;
    for (external_id, _) in ABC {
        register(&exchange, event_id, external_id).await;
    }
    exchange
        .process(CloseRegistration { event_id })
        .await
        .unwrap();
    exchange
        .process(GenerateAssignments { event_id })
        .await
        .unwrap();
    let before = exchange
        .store()
        .participants_of_event(event_id)
        .await
        .unwrap();

    let err = exchange
        .process(GenerateAssignments { event_id })
        .await
        .unwrap_err();
    assert!(matches!(err, ExchangeError::AlreadyAssigned));
    let after = exchange
        .store()
        .participants_of_event(event_id)
        .await
        .unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_reveal_twice_is_stable() {
    let (exchange, _) = exchange_with_roster(&ABC[..2]).await;
    let event_id = create_event(&exchange, None).await;
    let a = register(&exchange, event_id, "UG22ICT0001").await;
    register(&exchange, event_id, "UG22ICT0002").await;
    exchange
        .process(CloseRegistration { event_id })
        .await
        .unwrap();
    exchange
        .process(GenerateAssignments { event_id })
        .await
        .unwrap();
    exchange.process(OpenReveal { event_id }).await.unwrap();

    let first = exchange.process(reveal(event_id, &a)).await.unwrap();
    assert_eq!(first.display_name, "Kofi Boateng");
    assert_eq!(first.initials, "KB");

    let err = exchange.process(reveal(event_id, &a)).await.unwrap_err();
    assert_eq!(err.to_string(), "You have already revealed your assignment.");
}

#[tokio::test]
async fn test_reveal_guards() {
    let (exchange, _) = exchange_with_roster(&ABC).await;
    let event_id = create_event(&exchange, None).await;
    let a = register(&exchange, event_id, "UG22ICT0001").await;
    let b = register(&exchange, event_id, "UG22ICT0002").await;

    let err = exchange.process(reveal(event_id, &a)).await.unwrap_err();
    assert!(matches!(err, ExchangeError::RevealNotOpen));

    // Someone else's token, and an unknown id, look the same.
    let stolen = RevealAssignment {
        event_id,
        external_id: a.external_id.clone(),
        token: b.reveal_token.clone(),
    };
    let err = exchange.process(stolen).await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid external id or token.");
    let unknown = RevealAssignment {
        event_id,
        external_id: "UG22ICT0003".to_string(),
        token: a.reveal_token.clone(),
    };
    let err = exchange.process(unknown).await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid external id or token.");

    // Case-insensitive id, surrounding whitespace on the token.
    let sloppy = RevealAssignment {
        event_id,
        external_id: " ug22ict0001".to_string(),
        token: format!(" {} ", a.reveal_token),
    };
    let err = exchange.process(sloppy).await.unwrap_err();
    assert!(matches!(err, ExchangeError::RevealNotOpen));
}

#[tokio::test]
async fn test_reveal_normalizes_id_but_not_token_case() {
    let (exchange, _) = exchange_with_roster(&ABC[..2]).await;
    let event_id = create_event(&exchange, None).await;
    let a = register(&exchange, event_id, "UG22ICT0001").await;
    register(&exchange, event_id, "UG22ICT0002").await;
    exchange
        .process(CloseRegistration { event_id })
        .await
        .unwrap();
    exchange
        .process(GenerateAssignments { event_id })
        .await
        .unwrap();
    exchange.process(OpenReveal { event_id }).await.unwrap();

    if a.reveal_token.chars().any(|c| c.is_ascii_alphabetic()) {
        let lowered = RevealAssignment {
            event_id,
            external_id: a.external_id.clone(),
            token: a.reveal_token.to_lowercase(),
        };
        let err = exchange.process(lowered).await.unwrap_err();
        assert!(matches!(err, ExchangeError::InvalidCredentials));
    }

    let typed = RevealAssignment {
        event_id,
        external_id: "  ug22ict0001 ".to_string(),
        token: format!("{}\n", a.reveal_token),
    };
    let recipient = exchange.process(typed).await.unwrap();
    assert_eq!(recipient.display_name, "Kofi Boateng");
}

#[tokio::test]
async fn test_reset_twice() {
    let (exchange, _) = exchange_with_roster(&ABC).await;
    let event_id = create_event(&exchange, None).await;
    let a = register(&exchange, event_id, "UG22ICT0001").await;
    register(&exchange, event_id, "UG22ICT0002").await;
    register(&exchange, event_id, "UG22ICT0003").await;
    exchange
        .process(CloseRegistration { event_id })
        .await
        .unwrap();
    exchange
        .process(GenerateAssignments { event_id })
        .await
        .unwrap();
    exchange.process(OpenReveal { event_id }).await.unwrap();
    exchange.process(reveal(event_id, &a)).await.unwrap();

    let first = exchange
        .process(ResetAssignments { event_id })
        .await
        .unwrap();
    assert_eq!(first.cleared, 3);
    let second = exchange
        .process(ResetAssignments { event_id })
        .await
        .unwrap();
    assert_eq!(second.cleared, 0);

    let event = exchange.store().get_event(event_id).await.unwrap().unwrap();
    assert!(!event.reveal_open);

    // Eligibility survives the reset.
    let student = exchange
        .process(FindEligible {
            external_id: "UG22ICT0001".to_string(),
        })
        .await
        .unwrap()
        .unwrap();
    assert!(student.is_registered);

    // A fresh round works and the old reveal is forgotten.
    exchange
        .process(GenerateAssignments { event_id })
        .await
        .unwrap();
    exchange.process(OpenReveal { event_id }).await.unwrap();
    exchange.process(reveal(event_id, &a)).await.unwrap();
}

#[tokio::test]
async fn test_register_round_trip() {
    let (exchange, _) = exchange_with_roster(&ABC).await;
    let event_id = create_event(&exchange, None).await;
    register(&exchange, event_id, "ug22ict0002").await;

    let student = exchange
        .process(FindEligible {
            external_id: "UG22ICT0002".to_string(),
        })
        .await
        .unwrap()
        .unwrap();
    assert!(student.is_registered);

    let err = exchange
        .process(Register {
            event_id,
            display_name: "Kofi".to_string(),
            external_id: "UG22ICT0002".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ExchangeError::AlreadyRegistered));

    // Registered once means registered everywhere.
    let other_event = create_event(&exchange, None).await;
    let err = exchange
        .process(Register {
            event_id: other_event,
            display_name: String::new(),
            external_id: "UG22ICT0002".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ExchangeError::AlreadyRegistered));
}

#[tokio::test]
async fn test_single_participant_cannot_be_deranged() {
    let (exchange, _) = exchange_with_roster(&ABC).await;
    let event_id = create_event(&exchange, None).await;
    register(&exchange, event_id, "UG22ICT0001").await;
    exchange
        .process(CloseRegistration { event_id })
        .await
        .unwrap();

    let err = exchange
        .process(GenerateAssignments { event_id })
        .await
        .unwrap_err();
    assert!(matches!(err, ExchangeError::InsufficientParticipants));
    assert_eq!(err.to_string(), "Not enough participants.");
}

#[tokio::test]
async fn test_events_do_not_share_participants() {
    let (exchange, _) = exchange_with_roster(&ABC).await;
    let first = create_event(&exchange, None).await;
    let second = create_event(&exchange, None).await;
    register(&exchange, first, "UG22ICT0001").await;
    register(&exchange, first, "UG22ICT0002").await;
    register(&exchange, second, "UG22ICT0003").await;

    for event_id in [first, second] {
        exchange
            .process(CloseRegistration { event_id })
            .await
            .unwrap();
    }
    exchange
        .process(GenerateAssignments { event_id: first })
        .await
        .unwrap();
    let err = exchange
        .process(GenerateAssignments { event_id: second })
        .await
        .unwrap_err();
    assert!(matches!(err, ExchangeError::InsufficientParticipants));
}
