//! Property-based tests for the dispatcher
//!
//! These tests verify key invariants hold across arbitrary event sequences.

use super::*;
use crate::answer::{Answer, AnswerError};
use crate::conversation::{group_by_page, Citation, SessionId};
use crate::runtime::{AnswerJob, ChatSession};
use proptest::prelude::*;
use std::collections::HashSet;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_session() -> ChatSession {
    ChatSession::with_session_id(DispatchContext::default(), SessionId::from("prop"))
}

/// What the driver does next; settlements refer to the last issued job
#[derive(Debug, Clone)]
enum Op {
    Submit(String),
    Draft(String),
    SubmitDraft,
    Toggle(usize, u32),
    Reset,
    Succeed(Vec<Citation>),
    Fail,
    /// Settle with a generation that never was issued
    SettleStale,
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z¿? ]{1,30}",
        Just(String::new()),
        Just("   ".to_string()),
        Just("\n\t".to_string()),
    ]
}

fn arb_citation() -> impl Strategy<Value = Citation> {
    (0.0f64..1.0, "[a-z ]{0,20}", 1u32..8).prop_map(|(score, text, page)| Citation::new(score, text, page))
}

fn arb_citations() -> impl Strategy<Value = Vec<Citation>> {
    proptest::collection::vec(arb_citation(), 0..12)
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => arb_text().prop_map(Op::Submit),
        1 => arb_text().prop_map(Op::Draft),
        1 => Just(Op::SubmitDraft),
        2 => (0usize..8, 1u32..8).prop_map(|(t, p)| Op::Toggle(t, p)),
        1 => Just(Op::Reset),
        3 => arb_citations().prop_map(Op::Succeed),
        2 => Just(Op::Fail),
        1 => Just(Op::SettleStale),
    ]
}

fn arb_state() -> impl Strategy<Value = DispatchState> {
    prop_oneof![
        (0u64..100).prop_map(|generation| DispatchState::Idle { generation }),
        (0u64..100).prop_map(|generation| DispatchState::Pending { generation }),
    ]
}

/// Apply one op; returns whether the session accepted it
fn apply(session: &mut ChatSession, last_job: &mut Option<AnswerJob>, op: Op) -> bool {
    let event = match op {
        Op::Submit(text) => Event::submit(text),
        Op::Draft(text) => Event::DraftChanged { text },
        Op::SubmitDraft => Event::SubmitDraft,
        Op::Toggle(turn, page) => Event::toggle(turn, page),
        Op::Reset => Event::Reset,
        Op::Succeed(citations) => match last_job {
            Some(job) => Event::AnswerReceived {
                generation: job.generation,
                answer: Answer::new("answer", citations),
            },
            None => return false,
        },
        Op::Fail => match last_job {
            Some(job) => Event::AnswerFailed {
                generation: job.generation,
                error: AnswerError::network("down"),
            },
            None => return false,
        },
        Op::SettleStale => Event::AnswerReceived {
            generation: u64::MAX,
            answer: Answer::new("ghost", vec![]),
        },
    };

    match session.handle(event) {
        Ok(Some(job)) => {
            *last_job = Some(job);
            true
        }
        Ok(None) => true,
        Err(_) => false,
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Turns always alternate user/assistant, starting with user
    #[test]
    fn prop_turns_alternate(ops in proptest::collection::vec(arb_op(), 0..40)) {
        let mut session = test_session();
        let mut last_job = None;

        for op in ops {
            apply(&mut session, &mut last_job, op);

            let turns = session.conversation().turns();
            for (i, turn) in turns.iter().enumerate() {
                prop_assert_eq!(turn.is_user(), i % 2 == 0);
            }
            // Pending exactly when the last turn is an unanswered query
            prop_assert_eq!(session.is_pending(), turns.len() % 2 == 1);
        }
    }

    /// Rejected events leave the session untouched
    #[test]
    fn prop_rejected_events_change_nothing(ops in proptest::collection::vec(arb_op(), 0..40)) {
        let mut session = test_session();
        let mut last_job = None;

        for op in ops {
            let before = session.snapshot();
            if !apply(&mut session, &mut last_job, op) {
                let after = session.snapshot();
                prop_assert_eq!(before.state, after.state);
                prop_assert_eq!(before.turns, after.turns);
                prop_assert_eq!(before.draft, after.draft);
            }
        }
    }

    /// At most one request is outstanding at a time
    #[test]
    fn prop_single_flight(ops in proptest::collection::vec(arb_op(), 0..40)) {
        let mut session = test_session();
        let mut last_job: Option<AnswerJob> = None;

        for op in ops {
            let was_pending = session.is_pending();
            let prev_job = last_job.clone();
            apply(&mut session, &mut last_job, op);
            if was_pending && session.is_pending() {
                // Still the same request in flight
                prop_assert_eq!(&prev_job, &last_job);
            }
        }
    }

    /// Reset empties the conversation from any point
    #[test]
    fn prop_reset_clears_everything(ops in proptest::collection::vec(arb_op(), 0..30)) {
        let mut session = test_session();
        let mut last_job = None;
        for op in ops {
            apply(&mut session, &mut last_job, op);
        }
        let generation = session.state().generation();

        session.handle(Event::Reset).unwrap();

        prop_assert!(session.conversation().is_empty());
        prop_assert!(session.expansion().is_empty());
        prop_assert_eq!(session.draft(), "");
        prop_assert_eq!(session.state(), DispatchState::Idle { generation: generation + 1 });
    }

    /// A request issued before a reset can never settle afterwards
    #[test]
    fn prop_pre_reset_answers_are_discarded(
        before in proptest::collection::vec(arb_op(), 0..20),
        after in proptest::collection::vec(arb_op(), 0..20),
        citations in arb_citations(),
    ) {
        let mut session = test_session();
        let mut last_job = None;
        for op in before {
            apply(&mut session, &mut last_job, op);
        }
        let Some(old_job) = session.handle(Event::submit("old")).ok().flatten().or(last_job.clone()) else {
            return Ok(());
        };

        session.handle(Event::Reset).unwrap();
        for op in after {
            apply(&mut session, &mut last_job, op);
        }

        let turns_before = session.conversation().len();
        let result = session.handle(Event::AnswerReceived {
            generation: old_job.generation,
            answer: Answer::new("stale", citations),
        });
        prop_assert_eq!(result, Err(TransitionError::StaleSettlement { generation: old_job.generation }));
        prop_assert_eq!(session.conversation().len(), turns_before);
    }

    /// Toggling the same group twice restores its flag
    #[test]
    fn prop_double_toggle_is_identity(
        ops in proptest::collection::vec(arb_op(), 0..20),
        turn in 0usize..8,
        page in 1u32..8,
    ) {
        let mut session = test_session();
        let mut last_job = None;
        for op in ops {
            apply(&mut session, &mut last_job, op);
        }

        let before = session.expansion().is_expanded(turn, page);
        session.handle(Event::toggle(turn, page)).unwrap();
        prop_assert_ne!(session.expansion().is_expanded(turn, page), before);
        session.handle(Event::toggle(turn, page)).unwrap();
        prop_assert_eq!(session.expansion().is_expanded(turn, page), before);
    }

    /// Blank queries are rejected in every state
    #[test]
    fn prop_blank_submit_always_rejected(state in arb_state(), blank in "[ \t\n]{0,10}") {
        let result = transition(&state, &DispatchContext::default(), Event::submit(blank));
        prop_assert_eq!(result.unwrap_err(), TransitionError::EmptyQuery);
    }

    /// Reset always lands in Idle with a new generation
    #[test]
    fn prop_reset_bumps_generation(state in arb_state()) {
        let result = transition(&state, &DispatchContext::default(), Event::Reset).unwrap();
        prop_assert!(!result.new_state.is_pending());
        prop_assert_ne!(result.new_state.generation(), state.generation());
    }

    /// Display events never change the dispatch state
    #[test]
    fn prop_display_events_keep_state(state in arb_state(), text in arb_text(), turn in 0usize..8, page in 1u32..8) {
        let ctx = DispatchContext::default();
        let result = transition(&state, &ctx, Event::DraftChanged { text }).unwrap();
        prop_assert_eq!(result.new_state, state);
        let result = transition(&state, &ctx, Event::toggle(turn, page)).unwrap();
        prop_assert_eq!(result.new_state, state);
    }

    /// Grouping partitions the citations, pages in first-occurrence order
    #[test]
    fn prop_grouping_partitions(citations in arb_citations()) {
        let groups = group_by_page(&citations);

        let total: usize = groups.iter().map(|g| g.len()).sum();
        prop_assert_eq!(total, citations.len());

        let pages: Vec<u32> = groups.iter().map(|g| g.page).collect();
        let mut seen = HashSet::new();
        let first_seen: Vec<u32> = citations.iter().map(|c| c.page).filter(|p| seen.insert(*p)).collect();
        prop_assert_eq!(pages, first_seen);

        for group in &groups {
            prop_assert!(!group.is_empty());
            let expected: Vec<&Citation> = citations.iter().filter(|c| c.page == group.page).collect();
            let actual: Vec<&Citation> = group.citations.iter().collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
