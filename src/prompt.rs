//! Prompt engine.
//!
//! A [`Prompter`] renders one [`Question`] and returns one [`Answer`]. The
//! walkthrough only goes through [`ask_question`], which builds the question
//! from a [`QuestionSpec`] position.

use crate::questions::{QuestionKind, QuestionSpec};
use crate::{Result, WalkthroughError};
use dialoguer::{Input, Select};
use std::collections::HashMap;
use tracing::debug;

/// A question ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub kind: QuestionKind,
    pub key: String,
    pub message: String,
    pub choices: Vec<String>,
    /// Initially highlighted choice (list) or prefilled text (input)
    pub default: Option<String>,
}

/// The answer to a single question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub key: String,
    pub value: String,
}

/// Renders questions to a user.
pub trait Prompter: Send {
    fn ask(&mut self, question: &Question) -> Result<Answer>;
}

/// Asks the question at `index` of `specs` with the given choices and
/// returns the chosen value.
///
/// # Errors
///
/// Returns [`WalkthroughError::InvalidMetadata`] if `index` is out of range,
/// or whatever the prompter fails with.
pub fn ask_question(
    prompter: &mut dyn Prompter,
    specs: &[QuestionSpec],
    index: usize,
    choices: &[String],
    default: Option<&str>,
) -> Result<String> {
    let spec = specs.get(index).ok_or_else(|| {
        WalkthroughError::InvalidMetadata(format!("no question at position {}", index))
    })?;

    let question = Question {
        kind: spec.kind,
        key: spec.key.clone(),
        message: spec.question.clone(),
        choices: choices.to_vec(),
        default: default.map(str::to_string),
    };

    debug!(key = %question.key, choices = question.choices.len(), "prompting");
    let answer = prompter.ask(&question)?;

    if answer.key != question.key {
        return Err(WalkthroughError::Prompt(format!(
            "expected an answer for '{}', got '{}'",
            question.key, answer.key
        )));
    }
    Ok(answer.value)
}

/// Terminal prompter backed by dialoguer.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask(&mut self, question: &Question) -> Result<Answer> {
        let value = match question.kind {
            QuestionKind::List => {
                if question.choices.is_empty() {
                    return Err(WalkthroughError::Prompt(format!(
                        "no choices for '{}'",
                        question.key
                    )));
                }

                let default = question
                    .default
                    .as_ref()
                    .and_then(|d| question.choices.iter().position(|c| c == d))
                    .unwrap_or(0);

                let selection = Select::new()
                    .with_prompt(&question.message)
                    .items(question.choices.as_slice())
                    .default(default)
                    .interact()?;
                question.choices[selection].clone()
            }
            QuestionKind::Input => {
                let mut input = Input::<String>::new().with_prompt(&question.message);
                if let Some(ref default) = question.default {
                    input = input.default(default.clone());
                }
                input.interact_text()?
            }
        };

        Ok(Answer {
            key: question.key.clone(),
            value,
        })
    }
}

/// Prompter that answers from a fixed script, keyed by question key.
///
/// Every question asked is recorded, so tests can assert what was (or was
/// not) prompted.
///
/// # Example
///
/// ```
/// use aurora_walkthrough::prompt::{ask_question, ScriptedPrompter};
/// use aurora_walkthrough::questions::DataSourceMetadata;
///
/// let metadata = DataSourceMetadata::bundled().unwrap();
/// let mut prompter = ScriptedPrompter::new().with_answer("region", "eu-west-1");
///
/// let region = ask_question(&mut prompter, &metadata.inputs, 0, &metadata.available_regions, None)
///     .unwrap();
/// assert_eq!(region, "eu-west-1");
/// assert_eq!(prompter.asked().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: HashMap<String, String>,
    asked: Vec<Question>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the value returned when a question with `key` is asked.
    pub fn with_answer(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.answers.insert(key.into(), value.into());
        self
    }

    /// Questions asked so far, in order.
    pub fn asked(&self) -> &[Question] {
        &self.asked
    }

    /// Keys of the questions asked so far, in order.
    pub fn asked_keys(&self) -> Vec<&str> {
        self.asked.iter().map(|q| q.key.as_str()).collect()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, question: &Question) -> Result<Answer> {
        self.asked.push(question.clone());

        let value = self.answers.get(&question.key).cloned().ok_or_else(|| {
            WalkthroughError::Prompt(format!("no scripted answer for '{}'", question.key))
        })?;

        if question.kind == QuestionKind::List && !question.choices.contains(&value) {
            return Err(WalkthroughError::Prompt(format!(
                "'{}' is not one of the choices for '{}'",
                value, question.key
            )));
        }

        Ok(Answer {
            key: question.key.clone(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs() -> Vec<QuestionSpec> {
        vec![
            QuestionSpec {
                kind: QuestionKind::List,
                key: "region".to_string(),
                question: "Region?".to_string(),
            },
            QuestionSpec {
                kind: QuestionKind::Input,
                key: "name".to_string(),
                question: "Name?".to_string(),
            },
        ]
    }

    #[test]
    fn test_ask_question_builds_from_spec() {
        let mut prompter = ScriptedPrompter::new().with_answer("region", "us-west-2");
        let choices = vec!["us-east-1".to_string(), "us-west-2".to_string()];

        let value =
            ask_question(&mut prompter, &specs(), 0, &choices, Some("us-east-1")).unwrap();
        assert_eq!(value, "us-west-2");

        let asked = &prompter.asked()[0];
        assert_eq!(asked.message, "Region?");
        assert_eq!(asked.choices, choices);
        assert_eq!(asked.default.as_deref(), Some("us-east-1"));
    }

    #[test]
    fn test_input_question_accepts_any_value() {
        let mut prompter = ScriptedPrompter::new().with_answer("name", "orders");
        let value = ask_question(&mut prompter, &specs(), 1, &[], None).unwrap();
        assert_eq!(value, "orders");
    }

    #[test]
    fn test_missing_question_position() {
        let mut prompter = ScriptedPrompter::new();
        let err = ask_question(&mut prompter, &specs(), 5, &[], None).unwrap_err();
        assert!(matches!(err, WalkthroughError::InvalidMetadata(_)));
        assert!(prompter.asked().is_empty());
    }

    #[test]
    fn test_scripted_answer_must_be_a_choice() {
        let mut prompter = ScriptedPrompter::new().with_answer("region", "mars-north-1");
        let choices = vec!["us-east-1".to_string()];
        let err = ask_question(&mut prompter, &specs(), 0, &choices, None).unwrap_err();
        assert!(matches!(err, WalkthroughError::Prompt(_)));
    }

    #[test]
    fn test_terminal_prompter_rejects_empty_list() {
        let question = Question {
            kind: QuestionKind::List,
            key: "databaseName".to_string(),
            message: "Database?".to_string(),
            choices: vec![],
            default: None,
        };
        let err = TerminalPrompter.ask(&question).unwrap_err();
        assert!(err.to_string().contains("no choices"));
    }
}
