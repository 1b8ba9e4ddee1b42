//! Property tests for prompt assembly and history truncation.

use proptest::prelude::*;

use walle_rag::chat::{Message, Role};
use walle_rag::prompt::{CONTEXT_HEADER, build_messages, system_message};

fn arb_history() -> impl Strategy<Value = Vec<Message>> {
    proptest::collection::vec(
        ("[a-z ]{1,30}", prop_oneof![Just(Role::User), Just(Role::Assistant)])
            .prop_map(|(content, role)| Message { role, content }),
        0..30,
    )
}

/// For any history and window, the forwarded list is system + at most
/// `window` history turns + the user message, the kept turns are exactly the
/// most recent ones, and their order is preserved.
mod prop_history_truncation {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn kept_turns_are_the_most_recent_in_order(
            history in arb_history(),
            window in 1usize..15,
        ) {
            let messages = build_messages(None, &history, "question", window);

            let kept = messages.len() - 2;
            prop_assert!(kept <= window);
            prop_assert_eq!(kept, history.len().min(window));

            prop_assert_eq!(messages[0].role, Role::System);
            prop_assert_eq!(messages.last().unwrap().role, Role::User);
            prop_assert_eq!(messages.last().unwrap().content.as_str(), "question");

            let expected = &history[history.len() - kept..];
            for (message, turn) in messages[1..1 + kept].iter().zip(expected) {
                prop_assert_eq!(message, turn);
            }
        }
    }
}

/// The grounding section appears exactly when non-blank context is supplied,
/// and always after the persona preamble.
mod prop_context_section {
    use super::*;

    proptest! {
        #[test]
        fn header_present_iff_context_is_non_blank(context in proptest::option::of("[ a-z]{0,40}")) {
            let assembled = system_message(context.as_deref());
            let expect_header = context.as_deref().is_some_and(|c| !c.trim().is_empty());

            prop_assert_eq!(assembled.contains(CONTEXT_HEADER), expect_header);
            prop_assert!(assembled.starts_with("You are Wall-E"));

            if let Some(at) = assembled.find(CONTEXT_HEADER) {
                prop_assert!(at > 0);
            }
        }
    }
}
