use std::io::{self, BufRead, Write};

/// Parse a 1-based menu selection, accepting surrounding whitespace.
#[must_use]
pub fn parse_choice(input: &str, max: usize) -> Option<usize> {
    input
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|choice| (1..=max).contains(choice))
}

/// Prompt until a valid choice is entered. `Ok(None)` means input ended.
///
/// # Errors
///
/// Propagates read and write failures.
pub fn read_choice(
    input: &mut dyn BufRead,
    out: &mut dyn Write,
    max: usize,
) -> io::Result<Option<usize>> {
    let mut line = String::new();
    loop {
        write!(out, "\nEnter your choice (1-{max}): ")?;
        out.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        match parse_choice(&line, max) {
            Some(choice) => return Ok(Some(choice)),
            None => writeln!(out, "Please enter a number between 1 and {max}")?,
        }
    }
}

/// Wait for Enter. Returns `false` when input ended.
///
/// # Errors
///
/// Propagates read and write failures.
pub fn pause(input: &mut dyn BufRead, out: &mut dyn Write, prompt: &str) -> io::Result<bool> {
    write!(out, "\n{prompt}")?;
    out.flush()?;
    let mut line = String::new();
    Ok(input.read_line(&mut line)? > 0)
}

/// Ask a yes/no question. Anything but `y` or `yes` is a no, and so is the
/// end of input.
///
/// # Errors
///
/// Propagates read and write failures.
pub fn ask_yes_no(
    input: &mut dyn BufRead,
    out: &mut dyn Write,
    question: &str,
) -> io::Result<bool> {
    write!(out, "\n{question} (y/N): ")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(false);
    }
    let answer = line.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}
