use std::io::{self, BufRead, Write};

use catalog_map::{ConfidenceThresholds, CorrectionPrompt, CorrectionRequest};

/// Asks the operator on the terminal. An empty answer accepts.
pub struct TerminalPrompt;

impl TerminalPrompt {
    fn ask(&self, request: &CorrectionRequest<'_>) -> io::Result<bool> {
        let mut stderr = io::stderr().lock();
        writeln!(
            stderr,
            "\n{field}: '{original}' is not in the authority ({count} record(s): {ids})",
            field = request.field,
            original = request.original,
            count = request.unit_ids.len(),
            ids = request.unit_ids.join(", "),
        )?;
        let confidence = ConfidenceThresholds::default()
            .categorize(request.score)
            .map_or("below review bands", |level| level.description());
        write!(
            stderr,
            "Replace with '{}' (similarity {:.0}%, {confidence})? [Y/n] ",
            request.suggestion,
            request.score * 100.0
        )?;
        stderr.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(matches!(
            answer.trim().to_lowercase().as_str(),
            "" | "y" | "yes" | "כ" | "כן"
        ))
    }
}

impl CorrectionPrompt for TerminalPrompt {
    fn confirm(&mut self, request: &CorrectionRequest<'_>) -> bool {
        self.ask(request).unwrap_or(false)
    }
}
