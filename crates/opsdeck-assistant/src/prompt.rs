//! Fixed prompts and fallback messages

use opsdeck_llm::Message;
use opsdeck_types::{ChatTurn, Speaker};

/// System instruction sent with every chat request
pub const SYSTEM_INSTRUCTION: &str = r#"You are a system management AI assistant integrated into a dashboard.
The user will give you commands.
If the user asks to perform an action, respond ONLY with a JSON object.
Possible actions are:
- 'ADD_USER': requires 'name' (string) and 'role' ('Admin', 'Operator', 'Viewer').
- 'OPTIMIZE_MEMORY': no parameters required.
- 'SHOW_PERFORMANCE': no parameters required.

Example user query: "Add a new operator named Alex."
Your JSON response: {"action": "ADD_USER", "params": {"name": "Alex", "role": "Operator"}}

If the user asks a question or makes a statement that is not a direct command, provide a helpful, concise text response.
Example user query: "What is the system status?"
Your text response: "The system is currently online with all services operational.""#;

pub const NOT_CONFIGURED_REPLY: &str = "API Key not configured. Please set up your API key.";
pub const BACKEND_ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again.";

pub const INSIGHTS_DISABLED: &str = "AI features are disabled. API key is not configured.";
pub const INSIGHT_FAILED: &str = "Failed to get AI insight. Please check the logs for details.";

/// Prior transcript followed by the new prompt, in backend roles
pub fn chat_messages(history: &[ChatTurn], prompt: &str) -> Vec<Message> {
    history
        .iter()
        .map(|turn| match turn.speaker {
            Speaker::User => Message::user(turn.text.clone()),
            Speaker::Assistant => Message::model(turn.text.clone()),
        })
        .chain(std::iter::once(Message::user(prompt)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsdeck_llm::MessageRole;
    use opsdeck_types::ASSISTANT_GREETING;

    #[test]
    fn test_history_maps_speakers_to_roles() {
        let history = vec![
            ChatTurn::assistant(ASSISTANT_GREETING),
            ChatTurn::user("Show performance"),
            ChatTurn::assistant("Executing action: SHOW_PERFORMANCE"),
        ];

        let messages = chat_messages(&history, "Thanks");

        let roles: Vec<MessageRole> = messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                MessageRole::Model,
                MessageRole::User,
                MessageRole::Model,
                MessageRole::User
            ]
        );
        assert_eq!(messages[0].content, ASSISTANT_GREETING);
        assert_eq!(messages[3].content, "Thanks");
    }

    #[test]
    fn test_system_instruction_lists_every_action() {
        for action in ["ADD_USER", "OPTIMIZE_MEMORY", "SHOW_PERFORMANCE"] {
            assert!(SYSTEM_INSTRUCTION.contains(action));
        }
    }
}
