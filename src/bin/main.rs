use std::io::{self, BufRead, Write};

use anyhow::Result;
use argh::FromArgs;
use received_field::{DateSource, ReceivedField};

/// Parse the value of Received trace header fields
#[derive(FromArgs)]
struct Args {
    /// print each field as it would be written back to a message
    #[argh(switch, short = 'e')]
    encoded: bool,
    /// field values, or whole "Received:" lines; read one per line from stdin when absent
    #[argh(positional)]
    values: Vec<String>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Args = argh::from_env();
    let values = if args.values.is_empty() {
        io::stdin().lock().lines().collect::<io::Result<Vec<_>>>()?
    } else {
        args.values
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for input in &values {
        let field =
            ReceivedField::parse_line(input).unwrap_or_else(|| ReceivedField::new(input.as_str()));
        log::debug!("{:?}", field);
        if args.encoded {
            out.write_all(field.encoded().as_bytes())?;
        } else {
            describe(&mut out, &field)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn describe(out: &mut impl Write, field: &ReceivedField) -> io::Result<()> {
    writeln!(out, "{}:", field.name())?;
    writeln!(out, "  info:    {}", field.info())?;
    match field.received_date() {
        Some(date) => {
            let source = match date.source {
                DateSource::Strict => "parsed",
                DateSource::Fallback => "recovered, time unknown",
            };
            writeln!(out, "  date:    {} ({})", date.value.to_rfc3339(), source)?;
        }
        None => writeln!(out, "  date:    -")?,
    }
    writeln!(
        out,
        "  format:  {}",
        field.formatted_date().as_deref().unwrap_or("-")
    )?;
    writeln!(out, "  decoded: {}", field.decoded())
}
