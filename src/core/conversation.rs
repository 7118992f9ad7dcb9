//! The ordered conversation log and outbound message preparation.
//!
//! The log is owned exclusively here and is strictly append-only: the user
//! half of an exchange is pushed optimistically before the network round
//! trip, and bot replies are pushed as their responses arrive. Nothing is
//! ever mutated or removed, so a failed send can never lose the user's
//! message.

use crate::api::ChatReply;
use crate::core::language::Language;
use crate::core::message::ChatMessage;

/// A chat request ready to hand to the backend, tagged with a request id so
/// its completion can be told apart from other in-flight sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundChat {
    pub request_id: u64,
    pub message: String,
    pub language: Language,
}

#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    next_request_id: u64,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn user_message_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_user()).count()
    }

    /// Validate and stage an outgoing message. Blank input (empty or
    /// whitespace-only) is a no-op: nothing is appended and no request is
    /// produced. Otherwise the user message is appended immediately and the
    /// outbound request returned.
    pub fn prepare_send(&mut self, text: &str, language: Language) -> Option<OutboundChat> {
        if text.trim().is_empty() {
            return None;
        }
        self.messages.push(ChatMessage::user(text));
        self.next_request_id += 1;
        Some(OutboundChat {
            request_id: self.next_request_id,
            message: text.to_string(),
            language,
        })
    }

    /// Append the bot half of an exchange. Replies are merged in arrival
    /// order, which for concurrent sends may differ from send order.
    pub fn merge_reply(&mut self, reply: &ChatReply) -> &ChatMessage {
        let message = ChatMessage::bot(
            reply.response.clone(),
            reply.parsed_sentiment(),
            reply.confidence,
        );
        self.messages.push(message);
        self.messages.last().expect("just pushed")
    }

    /// Drop the whole transcript (logout).
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::{Sender, Sentiment};

    fn reply(text: &str, sentiment: Option<&str>, confidence: Option<f64>) -> ChatReply {
        ChatReply {
            response: text.to_string(),
            sentiment: sentiment.map(str::to_string),
            confidence,
        }
    }

    #[test]
    fn blank_input_appends_nothing_and_produces_no_request() {
        let mut conversation = Conversation::new();
        assert_eq!(conversation.prepare_send("", Language::En), None);
        assert_eq!(conversation.prepare_send("   \t\n", Language::En), None);
        assert!(conversation.is_empty());
    }

    #[test]
    fn optimistic_append_counts_every_nonblank_send() {
        let mut conversation = Conversation::new();
        let texts = ["Hello", "  ", "How are you?", "", "Bye"];
        let mut sent = 0;
        for text in texts {
            if conversation.prepare_send(text, Language::En).is_some() {
                sent += 1;
            }
        }
        // No replies ever arrive; the user messages are all still there.
        assert_eq!(sent, 3);
        assert_eq!(conversation.user_message_count(), 3);
        assert_eq!(conversation.messages().len(), 3);
    }

    #[test]
    fn request_ids_are_distinct_and_increasing() {
        let mut conversation = Conversation::new();
        let first = conversation.prepare_send("one", Language::En).unwrap();
        let second = conversation.prepare_send("two", Language::Fr).unwrap();
        assert!(second.request_id > first.request_id);
        assert_eq!(second.language, Language::Fr);
    }

    #[test]
    fn hello_exchange_builds_the_expected_log() {
        let mut conversation = Conversation::new();
        let outbound = conversation.prepare_send("Hello", Language::En).unwrap();
        assert_eq!(outbound.message, "Hello");

        conversation.merge_reply(&reply("Hi there", Some("POSITIVE"), Some(0.87)));

        let log = conversation.messages();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].sender, Sender::User);
        assert_eq!(log[0].text, "Hello");
        assert!(log[0].sentiment.is_none());
        assert_eq!(log[1].sender, Sender::Bot);
        assert_eq!(log[1].text, "Hi there");
        assert_eq!(log[1].sentiment, Some(Sentiment::Positive));
        assert_eq!(log[1].confidence, Some(0.87));
    }

    #[test]
    fn concurrent_replies_merge_in_arrival_order() {
        let mut conversation = Conversation::new();
        conversation.prepare_send("first question", Language::En).unwrap();
        conversation.prepare_send("second question", Language::En).unwrap();

        // The second reply arrives before the first.
        conversation.merge_reply(&reply("answer two", Some("NEGATIVE"), Some(0.6)));
        conversation.merge_reply(&reply("answer one", Some("POSITIVE"), Some(0.9)));

        let texts: Vec<&str> = conversation
            .messages()
            .iter()
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(
            texts,
            vec!["first question", "second question", "answer two", "answer one"]
        );
    }

    #[test]
    fn malformed_reply_metadata_degrades_to_untagged_bot_message() {
        let mut conversation = Conversation::new();
        conversation.prepare_send("hi", Language::En).unwrap();
        conversation.merge_reply(&reply("ok", Some("confused"), None));

        let bot = &conversation.messages()[1];
        assert!(bot.is_bot());
        assert_eq!(bot.sentiment, None);
        assert_eq!(bot.confidence, None);
    }
}
