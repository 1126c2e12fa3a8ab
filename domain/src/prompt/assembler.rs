//! Instruction sequence assembly.

use crate::session::entities::{Message, Transcript};

/// Build the model context for one turn.
///
/// `[system(policy), ...history, user(user_message)]`, with history copied
/// unchanged and in order.
pub fn assemble_instructions(policy: &str, history: &[Message], user_message: &str) -> Transcript {
    let mut transcript = Transcript::new();
    transcript.push(Message::system(policy));
    for message in history {
        transcript.push(message.clone());
    }
    transcript.push(Message::user(user_message));
    transcript
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::entities::Role;

    #[test]
    fn test_empty_history_yields_two_entries() {
        let transcript = assemble_instructions("policy", &[], "Create a login flowchart");

        assert_eq!(
            transcript.messages(),
            &[
                Message::system("policy"),
                Message::user("Create a login flowchart")
            ]
        );
    }

    #[test]
    fn test_history_kept_in_order_between_policy_and_message() {
        let history = vec![
            Message::user("a"),
            Message::assistant("b"),
            Message::user("a"),
            Message::assistant("b"),
        ];
        let transcript = assemble_instructions("policy", &history, "next");

        assert_eq!(transcript.len(), 6);
        assert_eq!(transcript.messages()[0].role, Role::System);
        assert_eq!(&transcript.messages()[1..5], history.as_slice());
        assert_eq!(transcript.last(), Some(&Message::user("next")));
    }
}
