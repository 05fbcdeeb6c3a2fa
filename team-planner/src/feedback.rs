//! Human-feedback refinement around reasoning-service calls.
//!
//! Any stage that talks to the reasoning service routes its query through a
//! run-scoped [`FeedbackSession`]. With collection disabled the session is a
//! pass-through. With collection enabled, every response is shown to the
//! reviewer; a rejection mutates the query's active text with the full
//! correction history and re-issues the call. Iteration is bounded: once the
//! reviewer has rejected `max_rounds` responses the loop escalates with
//! `RefinementExhausted` instead of recursing further.
//!
//! The loop heals reasoning quality only. Structural failures (schema
//! validation, unknown workers) are never retried here.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use uuid::Uuid;

use crate::error::PlanError;
use crate::provider::ReasoningService;

/// Default bound on rejected rounds per query.
pub const DEFAULT_MAX_ROUNDS: usize = 3;

/// One reviewed exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub response: String,
    pub approved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction: Option<String>,
    pub reviewed_at: DateTime<Utc>,
}

/// A reasoning-service query plus its refinement state.
///
/// The identity hash is computed from the raw text once and never changes,
/// so every refinement iteration of the same query correlates in the log.
#[derive(Debug, Clone)]
pub struct Query {
    raw_text: String,
    active_text: Option<String>,
    identity_hash: String,
    history: Vec<FeedbackEntry>,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        let raw_text = text.into();
        let identity_hash = format!("{:x}", md5::compute(raw_text.as_bytes()));
        Self {
            raw_text,
            active_text: None,
            identity_hash,
            history: Vec::new(),
        }
    }

    /// Text to submit next: the refined text when present, the raw text
    /// otherwise.
    pub fn current_text(&self) -> &str {
        self.active_text.as_deref().unwrap_or(&self.raw_text)
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn identity_hash(&self) -> &str {
        &self.identity_hash
    }

    pub fn history(&self) -> &[FeedbackEntry] {
        &self.history
    }

    fn record(&mut self, entry: FeedbackEntry) {
        self.history.push(entry);
    }
}

/// Reviewer's verdict on one response.
#[derive(Debug, Clone)]
pub struct Verdict {
    pub approved: bool,
    pub correction: Option<String>,
}

/// External collaborator supplying correctness verdicts.
pub trait Reviewer: Send {
    fn review(&mut self, query: &Query, response: &str) -> Result<Verdict>;
}

/// Interactive reviewer on stdin/stdout.
pub struct ConsoleReviewer;

impl Reviewer for ConsoleReviewer {
    fn review(&mut self, query: &Query, response: &str) -> Result<Verdict> {
        let refined_note = if query.history().is_empty() {
            ""
        } else {
            " (based on your recent feedback)"
        };
        println!("\n{}", "*".repeat(80));
        println!("Review the reasoning service's response");
        println!("\n## Query:\n{}", query.raw_text());
        println!("\n## Response{}:\n{}", refined_note, response);
        println!("{}", "*".repeat(80));

        let approved = prompt_line("Was the response correct? (yes/no): ")?
            .trim()
            .eq_ignore_ascii_case("yes");
        let correction = if approved {
            None
        } else {
            let text = prompt_line("Please provide corrections or suggestions: ")?;
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        };

        Ok(Verdict {
            approved,
            correction,
        })
    }
}

fn prompt_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    std::io::stdout().flush().context("Failed to flush stdout")?;
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("Failed to read reviewer input")?;
    Ok(line)
}

/// Log value persisted per query identity hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedQuery {
    pub original_text: String,
    pub entries: Vec<FeedbackEntry>,
}

/// Run-scoped feedback state: collection flag, bound, reviewer handle and the
/// append-only log. Created at run start, flushed at run end.
pub struct FeedbackSession {
    enabled: bool,
    max_rounds: usize,
    run_id: Uuid,
    reviewer: Box<dyn Reviewer>,
    log: BTreeMap<String, LoggedQuery>,
}

impl FeedbackSession {
    pub fn new(enabled: bool, max_rounds: usize, reviewer: Box<dyn Reviewer>) -> Self {
        Self {
            enabled,
            max_rounds,
            run_id: Uuid::new_v4(),
            reviewer,
            log: BTreeMap::new(),
        }
    }

    /// Session that passes every exchange through untouched.
    pub fn disabled() -> Self {
        Self::new(false, DEFAULT_MAX_ROUNDS, Box::new(ConsoleReviewer))
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn logged(&self, identity_hash: &str) -> Option<&LoggedQuery> {
        self.log.get(identity_hash)
    }

    /// Issue `query` against the reasoning service, refining until the
    /// reviewer approves a response or the round bound is exhausted.
    pub async fn refined_ask(
        &mut self,
        service: &dyn ReasoningService,
        query: &mut Query,
    ) -> Result<String> {
        let mut rejected = 0usize;
        loop {
            let response = service
                .ask(query.current_text())
                .await
                .map_err(PlanError::Provider)?;
            if !self.enabled {
                return Ok(response);
            }

            let verdict = self.reviewer.review(query, &response)?;
            let entry = FeedbackEntry {
                response: response.clone(),
                approved: verdict.approved,
                correction: verdict.correction.clone(),
                reviewed_at: Utc::now(),
            };
            query.record(entry.clone());
            self.log
                .entry(query.identity_hash().to_string())
                .or_insert_with(|| LoggedQuery {
                    original_text: query.raw_text().to_string(),
                    entries: Vec::new(),
                })
                .entries
                .push(entry);

            if verdict.approved {
                query.active_text = None;
                return Ok(response);
            }

            rejected += 1;
            if rejected >= self.max_rounds {
                return Err(PlanError::RefinementExhausted { rounds: rejected }.into());
            }
            query.active_text = Some(compose_adjusted_prompt(query));
        }
    }

    /// Persist the append-only log as pretty JSON.
    pub fn flush(&self, path: &Path) -> Result<()> {
        let json =
            serde_json::to_string_pretty(&self.log).context("Failed to serialize feedback log")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write feedback log to {}", path.display()))?;
        Ok(())
    }
}

/// Build the refined query text: the original query, every prior
/// response/correction pair, the latest response and the correction to
/// incorporate.
fn compose_adjusted_prompt(query: &Query) -> String {
    let history = query.history();
    let (latest, prior) = match history.split_last() {
        Some(split) => split,
        // nothing reviewed yet; resubmit the original text
        None => return query.raw_text().to_string(),
    };

    let mut prior_sections = String::new();
    for (idx, entry) in prior.iter().enumerate() {
        prior_sections.push_str(&format!(
            "### Response {n}:\n{response}\n\n### Reviewer feedback on response {n}:\n{feedback}\n\n",
            n = idx + 1,
            response = entry.response,
            feedback = entry.correction.as_deref().unwrap_or("(approved)"),
        ));
    }

    let mut text = format!(
        "Adjust your response considering the reviewer's current feedback.\n\n\
         ## Original query:\n{}\n\n",
        query.raw_text()
    );
    if !prior_sections.is_empty() {
        text.push_str("## Earlier responses and feedback:\n\n");
        text.push_str(&prior_sections);
    }
    text.push_str(&format!(
        "## Your latest response:\n{}\n\n## The reviewer asks you to incorporate:\n{}\n",
        latest.response,
        latest.correction.as_deref().unwrap_or(""),
    ));
    text
}
