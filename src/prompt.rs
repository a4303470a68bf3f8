use std::io::{self, BufRead, Write};

fn read_answer<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Let the user pick one of `items` by number, exact name or a unique
/// substring. An empty answer or end of input cancels.
pub fn select<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
    items: &[String],
) -> io::Result<Option<String>> {
    writeln!(output, "{}:", label)?;
    for (i, item) in items.iter().enumerate() {
        writeln!(output, "  {:>3}) {}", i + 1, item)?;
    }

    loop {
        write!(output, "> ")?;
        output.flush()?;

        let answer = match read_answer(input)? {
            Some(answer) if !answer.is_empty() => answer,
            _ => return Ok(None),
        };

        if let Ok(n) = answer.parse::<usize>() {
            if (1..=items.len()).contains(&n) {
                return Ok(Some(items[n - 1].clone()));
            }
        }

        if let Some(item) = items.iter().find(|item| **item == answer) {
            return Ok(Some(item.clone()));
        }

        let matches: Vec<(usize, &String)> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.contains(answer.as_str()))
            .collect();

        match matches.as_slice() {
            [(_, item)] => return Ok(Some((*item).clone())),
            [] => writeln!(output, "No theme matches '{}'", answer)?,
            _ => {
                for (i, item) in &matches {
                    writeln!(output, "  {:>3}) {}", i + 1, item)?;
                }
            }
        }
    }
}

/// Ask a yes/no question. Anything but "y"/"yes" is a no; end of input is
/// an error.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> io::Result<bool> {
    write!(output, "{} [y/N]: ", label)?;
    output.flush()?;

    match read_answer(input)? {
        Some(answer) => Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes")),
        None => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no answer given")),
    }
}
