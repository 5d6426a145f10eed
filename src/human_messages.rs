//! Human-messages dataset: a mix of random alphanumeric noise and short chat
//! messages requested in batches from a [`MessageGenerator`].
//!
//! The message backend (an LLM client, a fixture, ...) stays outside the
//! crate; [`PromptedMessageGenerator`] wraps any completion closure with the
//! batch instruction and output cleaning every backend needs.

use std::path::{Path, PathBuf};

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use tracing::{debug, info};

use crate::config::HumanMessagesConfig;
use crate::constants::human_messages::{PROMPT_INSTRUCTION_SEPARATOR, VALID_RANDOM_CHARACTERS};
use crate::data::{HumanMessage, MessageKind};
use crate::errors::DatagenError;
use crate::rng::DeterministicRng;
use crate::transport::fs::write_jsonl;

/// Source of short chat messages.
pub trait MessageGenerator {
    /// One message for `user_prompt`.
    fn generate(&mut self, user_prompt: &str) -> Result<String, DatagenError>;

    /// Up to `batch_size` distinct non-empty messages for `user_prompt`.
    fn generate_many(
        &mut self,
        user_prompt: &str,
        batch_size: usize,
    ) -> Result<Vec<String>, DatagenError>;
}

/// Instruction appended to the user prompt when a batch is requested.
pub fn batch_instruction(batch_size: usize) -> String {
    format!(
        "Produce {batch_size} distinct short chat messages as a JSON array of strings. Avoid commentary."
    )
}

/// Full prompt sent to the backend for one batch.
pub fn batch_prompt(user_prompt: &str, batch_size: usize) -> String {
    format!(
        "{user_prompt}{PROMPT_INSTRUCTION_SEPARATOR}{}",
        batch_instruction(batch_size)
    )
}

/// [`MessageGenerator`] over a completion closure.
///
/// The closure receives `(system_prompt, prompt)` and returns the raw
/// messages the backend produced.
pub struct PromptedMessageGenerator<F>
where
    F: FnMut(&str, &str) -> Result<Vec<String>, DatagenError>,
{
    system_prompt: String,
    backend: F,
}

impl<F> PromptedMessageGenerator<F>
where
    F: FnMut(&str, &str) -> Result<Vec<String>, DatagenError>,
{
    /// Wrap `backend`, passing `system_prompt` on every call.
    pub fn new(system_prompt: impl Into<String>, backend: F) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            backend,
        }
    }

    /// System prompt forwarded to the backend.
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    fn complete(&mut self, prompt: &str) -> Result<Vec<String>, DatagenError> {
        let raw = (self.backend)(&self.system_prompt, prompt)?;
        Ok(clean_messages(raw))
    }
}

impl<F> MessageGenerator for PromptedMessageGenerator<F>
where
    F: FnMut(&str, &str) -> Result<Vec<String>, DatagenError>,
{
    fn generate(&mut self, user_prompt: &str) -> Result<String, DatagenError> {
        self.complete(user_prompt)?
            .into_iter()
            .next()
            .ok_or_else(|| DatagenError::EmptyResult("backend returned an empty message".into()))
    }

    fn generate_many(
        &mut self,
        user_prompt: &str,
        batch_size: usize,
    ) -> Result<Vec<String>, DatagenError> {
        if batch_size == 0 {
            return Err(DatagenError::Configuration(
                "batch_size must be positive".into(),
            ));
        }
        let mut messages = self.complete(&batch_prompt(user_prompt, batch_size))?;
        if messages.is_empty() {
            return Err(DatagenError::EmptyResult(
                "backend returned an empty message list".into(),
            ));
        }
        messages.truncate(batch_size);
        Ok(messages)
    }
}

fn clean_messages(raw: Vec<String>) -> Vec<String> {
    raw.into_iter()
        .map(|message| message.trim().to_string())
        .filter(|message| !message.is_empty())
        .collect()
}

/// Build exactly `config.dataset_size` shuffled entries.
///
/// `floor(dataset_size * random_fraction)` entries are random strings; the
/// rest come from `generator` in batches of `synthetic_batch_size`, each
/// batch using a prompt drawn uniformly from `user_prompts_for_generation`.
pub fn build_human_messages_dataset<G>(
    config: &HumanMessagesConfig,
    generator: &mut G,
) -> Result<Vec<HumanMessage>, DatagenError>
where
    G: MessageGenerator + ?Sized,
{
    config.validate()?;
    let batch_size = config.batch_size()?;
    let random_count = config.random_count().min(config.dataset_size);
    let mut rng = DeterministicRng::new(config.random_seed);
    let mut samples = Vec::with_capacity(config.dataset_size);

    if random_count > 0 {
        let (min_len, max_len) = config.length_bounds()?;
        for _ in 0..random_count {
            samples.push(HumanMessage {
                text: random_sequence(&mut rng, min_len, max_len),
                kind: MessageKind::Random,
            });
        }
    }

    let mut remaining = config.dataset_size - random_count;
    let mut batches = 0usize;
    while remaining > 0 {
        let prompt = config
            .user_prompts_for_generation
            .choose(&mut rng)
            .ok_or_else(|| {
                DatagenError::Configuration(
                    "user_prompts_for_generation must contain at least one prompt".into(),
                )
            })?;
        let batch = generator.generate_many(prompt, batch_size)?;
        if batch.is_empty() {
            return Err(DatagenError::EmptyResult(format!(
                "batch {batches} for prompt '{prompt}' was empty"
            )));
        }
        batches += 1;
        for text in batch.into_iter().take(remaining) {
            samples.push(HumanMessage {
                text: text.trim().to_string(),
                kind: MessageKind::Synthetic,
            });
            remaining -= 1;
        }
        debug!(
            "[slam_datagen:human_messages] batch {} done, {} synthetic messages remaining",
            batches, remaining
        );
    }

    samples.shuffle(&mut rng);
    samples.truncate(config.dataset_size);
    info!(
        "[slam_datagen:human_messages] built {} entries ({} random, {} synthetic batches)",
        samples.len(),
        random_count,
        batches
    );
    Ok(samples)
}

/// Write entries as JSON lines, creating parent directories as needed.
pub fn write_human_messages_dataset(
    samples: &[HumanMessage],
    output_file: impl AsRef<Path>,
) -> Result<PathBuf, DatagenError> {
    write_jsonl(samples, output_file)
}

fn random_sequence<R: Rng + ?Sized>(rng: &mut R, min_len: usize, max_len: usize) -> String {
    let target_len = rng.random_range(min_len..=max_len);
    (0..target_len)
        .map(|_| VALID_RANDOM_CHARACTERS[rng.random_range(0..VALID_RANDOM_CHARACTERS.len())] as char)
        .collect()
}
