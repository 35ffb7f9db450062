//! Prediction plus judge evaluation.
//!
//! Each case is answered by the model under test, then a judge model is asked
//! whether the prediction matches the reference answer. The tally counts the
//! judge's "yes" verdicts against every evaluated case.

use crate::errors::FinetuneResult;
use crate::pipeline::dataset::{SkippedRow, SourceRow, TrainingRecord};
use crate::services::chat::{ChatCompletionRequest, ChatCompletionService, ChatMessage, ContentPart};
use serde::Serialize;
use std::fmt;
use std::io::Write;

const JUDGE_SYSTEM_PROMPT: &str = "You grade answers to questions about images. \
Compare the candidate answer with the reference answer and reply with a single word: Yes if the \
candidate is correct, No otherwise.";

#[derive(Debug, Clone, PartialEq)]
pub struct EvalCase {
    pub id: usize,
    pub question: String,
    pub image_url: Option<String>,
    pub expected: String,
    /// System turn the model was trained with, used when the harness has none.
    pub system_prompt: Option<String>,
}

impl EvalCase {
    pub fn new(id: usize, question: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            id,
            question: question.into(),
            image_url: None,
            expected: expected.into(),
            system_prompt: None,
        }
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Builds a case from a training record; `None` when the record lacks a
    /// question or an answer.
    pub fn from_record(id: usize, record: &TrainingRecord) -> Option<Self> {
        let case = Self {
            id,
            question: record.question()?,
            image_url: record.image_url().map(str::to_string),
            expected: record.answer()?,
            system_prompt: record.system_prompt(),
        };
        Some(case)
    }

    /// Builds a case straight from a source row. The image column must
    /// already be a URL the model can fetch; local paths are dropped.
    pub fn from_source(id: usize, row: &SourceRow) -> Option<Self> {
        let text = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        let image_url = text(&row.image).filter(|image| {
            ["http://", "https://", "data:"]
                .iter()
                .any(|scheme| image.starts_with(scheme))
        });

        Some(Self {
            id,
            question: text(&row.question)?,
            image_url,
            expected: text(&row.answer)?,
            system_prompt: None,
        })
    }
}

/// Evaluation cases built from training records, plus the records that had
/// no question or answer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseSet {
    pub cases: Vec<EvalCase>,
    pub skipped: Vec<SkippedRow>,
}

/// Turns records into cases numbered from 1. Records without a question or
/// an answer are logged and skipped.
pub fn cases_from_records(records: &[TrainingRecord]) -> CaseSet {
    let mut set = CaseSet::default();
    for (index, record) in records.iter().enumerate() {
        let id = index + 1;
        match EvalCase::from_record(id, record) {
            Some(case) => set.cases.push(case),
            None => {
                tracing::warn!(record = id, "skipping record without question/answer");
                set.skipped.push(SkippedRow {
                    row: id,
                    reason: "record has no question or answer".to_string(),
                });
            }
        }
    }
    set
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JudgeVerdict {
    Correct,
    Incorrect,
    /// The judge's reply was neither yes nor no.
    Unparseable,
}

impl JudgeVerdict {
    /// Reads the first word of the judge reply.
    pub fn parse(reply: &str) -> Self {
        let word = reply
            .split_whitespace()
            .next()
            .unwrap_or("")
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_ascii_lowercase();

        match word.as_str() {
            "yes" | "correct" | "true" | "1" => JudgeVerdict::Correct,
            "no" | "incorrect" | "false" | "0" => JudgeVerdict::Incorrect,
            _ => JudgeVerdict::Unparseable,
        }
    }
}

impl fmt::Display for JudgeVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JudgeVerdict::Correct => "correct",
            JudgeVerdict::Incorrect => "incorrect",
            JudgeVerdict::Unparseable => "unparseable",
        };
        f.write_str(s)
    }
}

/// Running accuracy. Unparseable verdicts count as evaluated, not correct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccuracyTally {
    pub evaluated: usize,
    pub correct: usize,
    pub unparseable: usize,
}

impl AccuracyTally {
    pub fn record(&mut self, verdict: JudgeVerdict) {
        self.evaluated += 1;
        match verdict {
            JudgeVerdict::Correct => self.correct += 1,
            JudgeVerdict::Incorrect => {}
            JudgeVerdict::Unparseable => self.unparseable += 1,
        }
    }

    /// `None` when nothing has been evaluated.
    pub fn accuracy(&self) -> Option<f64> {
        if self.evaluated == 0 {
            None
        } else {
            Some(self.correct as f64 / self.evaluated as f64)
        }
    }
}

impl fmt::Display for AccuracyTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.accuracy() {
            Some(accuracy) => write!(
                f,
                "{}/{} correct ({:.1}%)",
                self.correct,
                self.evaluated,
                accuracy * 100.0
            ),
            None => f.write_str("n/a (no rows evaluated)"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EvalResult {
    pub id: usize,
    pub question: String,
    pub expected: String,
    pub prediction: String,
    pub verdict: JudgeVerdict,
}

#[derive(Debug, Clone, Default)]
pub struct EvaluationReport {
    pub results: Vec<EvalResult>,
    pub tally: AccuracyTally,
}

impl EvaluationReport {
    pub fn push(&mut self, result: EvalResult) {
        self.tally.record(result.verdict);
        self.results.push(result);
    }

    pub fn accuracy(&self) -> Option<f64> {
        self.tally.accuracy()
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> FinetuneResult<()> {
        let mut writer = csv::Writer::from_writer(writer);
        for result in &self.results {
            writer.serialize(result)?;
        }
        writer.flush()?;
        Ok(())
    }
}

pub struct EvaluationHarness<'a> {
    chat: &'a dyn ChatCompletionService,
    model: String,
    judge_model: String,
    system_prompt: Option<String>,
    max_tokens: Option<u32>,
}

impl<'a> EvaluationHarness<'a> {
    pub fn new(
        chat: &'a dyn ChatCompletionService,
        model: impl Into<String>,
        judge_model: impl Into<String>,
    ) -> Self {
        Self {
            chat,
            model: model.into(),
            judge_model: judge_model.into(),
            system_prompt: None,
            max_tokens: None,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    fn request(&self, model: &str, messages: Vec<ChatMessage>) -> ChatCompletionRequest {
        let mut request = ChatCompletionRequest::new(model, messages).with_temperature(0.0);
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        request
    }

    /// Asks the model under test to answer `case`.
    pub async fn predict(&self, case: &EvalCase) -> FinetuneResult<String> {
        let mut messages = Vec::with_capacity(2);
        if let Some(prompt) = self.system_prompt.as_ref().or(case.system_prompt.as_ref()) {
            messages.push(ChatMessage::system(prompt.clone()));
        }
        messages.push(match &case.image_url {
            Some(url) => ChatMessage::user_parts(vec![
                ContentPart::text(case.question.clone()),
                ContentPart::image(url.clone()),
            ]),
            None => ChatMessage::user(case.question.clone()),
        });

        let response = self.chat.create(self.request(&self.model, messages)).await?;
        Ok(response.first_text().unwrap_or_default().trim().to_string())
    }

    /// Asks the judge model whether `prediction` answers `case` correctly.
    pub async fn judge(&self, case: &EvalCase, prediction: &str) -> FinetuneResult<JudgeVerdict> {
        let prompt = format!(
            "Question: {}\nReference answer: {}\nCandidate answer: {}\nIs the candidate answer correct? Reply Yes or No.",
            case.question, case.expected, prediction
        );
        let messages = vec![ChatMessage::system(JUDGE_SYSTEM_PROMPT), ChatMessage::user(prompt)];

        let response = self
            .chat
            .create(self.request(&self.judge_model, messages))
            .await?;
        let reply = response.first_text().unwrap_or_default();
        let verdict = JudgeVerdict::parse(&reply);
        if verdict == JudgeVerdict::Unparseable {
            tracing::warn!(case = case.id, reply = %reply, "judge reply was not yes or no");
        }
        Ok(verdict)
    }

    /// Evaluates every case in order. Remote errors abort the run.
    pub async fn evaluate(&self, cases: &[EvalCase]) -> FinetuneResult<EvaluationReport> {
        let mut report = EvaluationReport::default();

        for case in cases {
            let prediction = self.predict(case).await?;
            let verdict = self.judge(case, &prediction).await?;
            tracing::debug!(case = case.id, %verdict, "case evaluated");

            report.push(EvalResult {
                id: case.id,
                question: case.question.clone(),
                expected: case.expected.clone(),
                prediction,
                verdict,
            });
        }

        tracing::info!(
            model = %self.model,
            judge = %self.judge_model,
            evaluated = report.tally.evaluated,
            correct = report.tally.correct,
            "evaluation finished"
        );
        Ok(report)
    }
}
