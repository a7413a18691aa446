// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{ChatReply, ChatTransport, render_answer};
use anyhow::Result;
use shiksha_model::Language;
use time::OffsetDateTime;
use tracing::warn;

const ERROR_ANSWER_EN: &str = "Unable to process your question at this time. Please try again.";
const ERROR_ANSWER_HI: &str =
    "\u{0907}\u{0938} \u{0938}\u{092e}\u{092f} \u{0906}\u{092a}\u{0915}\u{0947} \u{092a}\u{094d}\u{0930}\u{0936}\u{094d}\u{0928} \u{0915}\u{093e} \u{0909}\u{0924}\u{094d}\u{0924}\u{0930} \u{0928}\u{0939}\u{0940}\u{0902} \u{0926}\u{093f}\u{092f}\u{093e} \u{091c}\u{093e} \u{0938}\u{0915}\u{093e}\u{0964} \u{0915}\u{0943}\u{092a}\u{092f}\u{093e} \u{092a}\u{0941}\u{0928}\u{0903} \u{092a}\u{094d}\u{0930}\u{092f}\u{093e}\u{0938} \u{0915}\u{0930}\u{0947}\u{0902}\u{0964}";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error("question must not be empty")]
    Empty,
    #[error("a question is already in flight")]
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Sending,
}

/// Token for a question the session has accepted but not yet answered.
/// Holding one keeps the session in `Sending` until `complete` is called.
#[derive(Debug)]
pub struct PendingAsk {
    query: String,
    language: Language,
    asked_at: OffsetDateTime,
}

impl PendingAsk {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

/// One question and its answer (or error placeholder) in the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatExchange {
    pub query: String,
    pub language: Language,
    pub answer: String,
    pub answer_html: String,
    pub mode: String,
    pub sources: Vec<String>,
    pub asked_at: OffsetDateTime,
}

/// Conversation state for the assistant widget. At most one question is
/// in flight; a second `begin` while sending is refused rather than
/// queued.
pub struct ChatSession {
    language: Language,
    phase: SessionPhase,
    transcript: Vec<ChatExchange>,
}

impl ChatSession {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            phase: SessionPhase::Idle,
            transcript: Vec::new(),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Applies to questions asked after the change; exchanges already in
    /// the transcript keep the language they were asked in.
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn transcript(&self) -> &[ChatExchange] {
        &self.transcript
    }

    /// Accept a question for sending. The query is trimmed; an empty
    /// query or an in-flight question is refused.
    pub fn begin(&mut self, query: &str) -> Result<PendingAsk, ChatError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ChatError::Empty);
        }
        if self.phase == SessionPhase::Sending {
            return Err(ChatError::Busy);
        }

        self.phase = SessionPhase::Sending;
        Ok(PendingAsk {
            query: query.to_owned(),
            language: self.language,
            asked_at: OffsetDateTime::now_utc(),
        })
    }

    /// Record the outcome of a pending question. A transport failure
    /// becomes a synthetic error exchange in the asking language, so the
    /// transcript never loses the question.
    pub fn complete(&mut self, pending: PendingAsk, outcome: Result<ChatReply>) -> &ChatExchange {
        self.phase = SessionPhase::Idle;

        let exchange = match outcome {
            Ok(reply) => ChatExchange {
                query: pending.query,
                language: pending.language,
                answer_html: render_answer(&reply.answer),
                answer: reply.answer,
                mode: reply.mode,
                sources: reply.sources,
                asked_at: pending.asked_at,
            },
            Err(error) => {
                warn!(query = %pending.query, %error, "chat request failed");
                let answer = error_answer(pending.language).to_owned();
                ChatExchange {
                    query: pending.query,
                    language: pending.language,
                    answer_html: render_answer(&answer),
                    answer,
                    mode: "error".to_owned(),
                    sources: Vec::new(),
                    asked_at: pending.asked_at,
                }
            }
        };

        self.transcript.push(exchange);
        &self.transcript[self.transcript.len() - 1]
    }

    /// Ask synchronously over the given transport.
    pub fn ask(
        &mut self,
        transport: &mut impl ChatTransport,
        query: &str,
    ) -> Result<&ChatExchange, ChatError> {
        let pending = self.begin(query)?;
        let outcome = transport.send(&pending.query, pending.language);
        Ok(self.complete(pending, outcome))
    }

    /// Plain-text transcript, one blank line between exchanges.
    pub fn export_transcript(&self) -> String {
        let mut out = String::new();
        for exchange in &self.transcript {
            out.push_str(&format!(
                "You: {}\nAssistant ({}): {}\n\n",
                exchange.query,
                exchange.mode.to_uppercase(),
                exchange.answer,
            ));
        }
        out
    }
}

fn error_answer(language: Language) -> &'static str {
    match language {
        Language::English => ERROR_ANSWER_EN,
        Language::Hindi => ERROR_ANSWER_HI,
    }
}
