//! Prompt assembly: persona, grounding context, and history truncation.
//!
//! Ordering invariant: the persona preamble always comes first in the system
//! message, with the retrieved-information section appended after it when
//! context exists. Grounding content never precedes or interleaves with the
//! persona instructions.

use crate::chat::Message;

/// The fixed persona and policy preamble for the support assistant.
pub const SYSTEM_PROMPT: &str = "You are Wall-E, a friendly AI assistant for Wall-E Electronics, a company that sells consumer electronics products including laptops, headphones, smartwatches, and accessories.

Your role:
- Answer customer questions about products, policies, and support
- Be concise, friendly, and helpful like Wall-E the robot
- If you don't know something, say so honestly
- Keep responses under 200 words unless more detail is needed
- When you have context from retrieved documents, base your answers on that information

Key Information:
- Return Policy: 30 days for unopened items, 14 days for opened (15% restocking fee for headphones)
- Laptop Warranty: 2 years
- Smartwatch/Headphones Warranty: 1 year
- Support: 1-800-WALL-E or support@wall-e.com";

/// Header introducing the grounding section of the system message.
pub const CONTEXT_HEADER: &str = "# Retrieved Information:";

/// Build the system message: persona first, then the grounding section when
/// context is present. Empty context is treated the same as no context.
pub fn system_message(context: Option<&str>) -> String {
    match context.filter(|c| !c.trim().is_empty()) {
        Some(context) => format!("{SYSTEM_PROMPT}\n\n{CONTEXT_HEADER}\n{context}"),
        None => SYSTEM_PROMPT.to_string(),
    }
}

/// Assemble the full message list for a completion call.
///
/// Fixed order: system message, then the most recent `history_window` turns
/// (older turns silently dropped, order preserved), then the new user message.
pub fn build_messages(
    context: Option<&str>,
    history: &[Message],
    user_message: &str,
    history_window: usize,
) -> Vec<Message> {
    let kept_start = history.len().saturating_sub(history_window);

    let mut messages = Vec::with_capacity(history.len() - kept_start + 2);
    messages.push(Message::system(system_message(context)));
    messages.extend(history[kept_start..].iter().cloned());
    messages.push(Message::user(user_message));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Role;

    #[test]
    fn persona_precedes_context() {
        let assembled = system_message(Some("Source 1: Warranty Policy"));
        let persona_at = assembled.find("You are Wall-E").unwrap();
        let header_at = assembled.find(CONTEXT_HEADER).unwrap();
        assert_eq!(persona_at, 0);
        assert!(header_at > persona_at);
        assert!(assembled.ends_with("Source 1: Warranty Policy"));
    }

    #[test]
    fn no_context_omits_header_entirely() {
        assert!(!system_message(None).contains(CONTEXT_HEADER));
        assert!(!system_message(Some("")).contains(CONTEXT_HEADER));
        assert!(!system_message(Some("   ")).contains(CONTEXT_HEADER));
    }

    #[test]
    fn fifteen_turns_keep_exactly_the_most_recent_ten() {
        let history: Vec<Message> =
            (0..15).map(|i| Message::user(format!("turn {i}"))).collect();

        let messages = build_messages(None, &history, "latest question", 10);

        // system + 10 history turns + new user message
        assert_eq!(messages.len(), 12);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].content, "turn 5");
        assert_eq!(messages[10].content, "turn 14");
        assert_eq!(messages[11].content, "latest question");
    }

    #[test]
    fn short_history_is_forwarded_whole() {
        let history = vec![Message::user("q1"), Message::assistant("a1")];
        let messages = build_messages(None, &history, "q2", 10);

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1].content, "q1");
        assert_eq!(messages[2].content, "a1");
        assert_eq!(messages[3].content, "q2");
    }

    #[test]
    fn user_message_is_always_last() {
        let messages = build_messages(Some("ctx"), &[], "only question", 10);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages.last().unwrap().content, "only question");
        assert_eq!(messages.last().unwrap().role, Role::User);
    }
}
