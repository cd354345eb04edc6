//! Interactive practice quiz over the problem bank.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use serde::Serialize;

use optics_core::{evaluate_with, CalculationProblem, Evaluation, OpticsSettings};

/// Per-question outcome, kept for the closing summary.
#[derive(Debug, Clone, Serialize)]
pub struct QuizAnswer {
    pub problem_id: String,
    pub answer: String,
    pub evaluation: Evaluation,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizSummary {
    pub asked: usize,
    pub correct: usize,
    pub answers: Vec<QuizAnswer>,
}

fn prompt_line(input: &mut impl BufRead, output: &mut impl Write, prompt: &str) -> io::Result<Option<String>> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Ask each problem in turn, grade the answer and show the worked steps.
///
/// Stops early at end of input or when the learner types `q`.
pub fn run_quiz(
    problems: &[&CalculationProblem],
    settings: &OpticsSettings,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<QuizSummary> {
    let mut answers = Vec::with_capacity(problems.len());

    for (i, problem) in problems.iter().enumerate() {
        writeln!(output)?;
        writeln!(
            output,
            "Question {}/{} [{} · {}]",
            i + 1,
            problems.len(),
            problem.kind(),
            problem.difficulty
        )?;
        writeln!(output, "{}", problem.question)?;

        let answer = match prompt_line(input, output, "> ")? {
            Some(a) if a.eq_ignore_ascii_case("q") => break,
            Some(a) => a,
            None => break,
        };

        let evaluation = evaluate_with(problem, &answer, settings)?;
        if evaluation.pass {
            writeln!(output, "[OK] Correct: {}", evaluation.expected)?;
        } else {
            writeln!(output, "[FAIL] Expected: {}", evaluation.expected)?;
        }
        writeln!(output, "{}", problem.explanation)?;
        for step in &problem.steps {
            writeln!(output, "  - {}", step)?;
        }

        answers.push(QuizAnswer {
            problem_id: problem.id.clone(),
            answer,
            evaluation,
        });
    }

    let correct = answers.iter().filter(|a| a.evaluation.pass).count();
    writeln!(output)?;
    writeln!(output, "Score: {}/{}", correct, answers.len())?;

    Ok(QuizSummary {
        asked: answers.len(),
        correct,
        answers,
    })
}
