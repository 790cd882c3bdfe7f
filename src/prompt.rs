//! Terminal front-end for the correction stage.
//!
//! Each field is shown with its current value; pressing Enter keeps it.
//! A rejected submission is prompted again, seeded with what the user typed.

use anyhow::{bail, Result};
use std::io::{BufRead, Write};

use crate::pipeline::{correct, FieldEdits};
use crate::record::{DraftRecord, VerifiedRecord};

fn read_answer<R: BufRead>(input: &mut R) -> Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("input closed before the record was confirmed");
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn prompt_text<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
    current: &str,
) -> Result<String> {
    write!(output, "{} [{}]: ", label, current)?;
    output.flush()?;
    let answer = read_answer(input)?;
    Ok(if answer.is_empty() {
        current.to_string()
    } else {
        answer
    })
}

fn prompt_count<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
    current: i64,
) -> Result<i64> {
    loop {
        write!(output, "{} [{}]: ", label, current)?;
        output.flush()?;
        let answer = read_answer(input)?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Ok(current);
        }
        match answer.parse::<i64>() {
            Ok(value) => return Ok(value),
            Err(_) => writeln!(output, "  not a whole number: {:?}", answer)?,
        }
    }
}

/// Asks for every field, starting from `seed`.
pub fn prompt_edits<R: BufRead, W: Write>(
    seed: FieldEdits,
    input: &mut R,
    output: &mut W,
) -> Result<FieldEdits> {
    let mut edits = seed;
    edits.play_date = prompt_text(input, output, "Play date", &edits.play_date)?;
    edits.level = prompt_text(input, output, "Level", &edits.level)?;
    edits.song_title = prompt_text(input, output, "Song title", &edits.song_title)?;

    for (name, current) in edits.counts() {
        let value = prompt_count(input, output, name, current)?;
        edits.set_count(name, value);
    }

    Ok(edits)
}

/// Runs the correction loop until the user submits valid values.
pub fn confirm_draft<R: BufRead, W: Write>(
    draft: &DraftRecord,
    input: &mut R,
    output: &mut W,
) -> Result<VerifiedRecord> {
    writeln!(output, "Check the extracted values (Enter keeps the value in brackets):")?;
    let mut seed = FieldEdits::from_draft(draft);

    loop {
        let edits = prompt_edits(seed, input, output)?;
        match correct(draft, edits.clone()) {
            Ok(record) => return Ok(record),
            Err(e) => {
                writeln!(output, "{}. Counts must be 0 or more, please re-enter.", e)?;
                seed = edits;
            }
        }
    }
}
