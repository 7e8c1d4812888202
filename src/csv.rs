use crate::record::Record;
use log::warn;

/// Parse one delimited line into its fields.
///
/// Double-quoted fields may contain the delimiter; a doubled quote (`""`)
/// inside a quoted field yields one literal quote. The parse is strictly
/// line-oriented: newlines inside fields are not supported by the sources
/// and not handled here.
///
/// # Arguments
/// * `line` - One line of delimited text, without its trailing newline
/// * `delimiter` - The field separator (`,` or `;` depending on the source)
///
/// # Returns
/// * `Vec<String>` - The field values, whitespace-trimmed
///
/// # Examples
/// ```
/// use fotosys::csv::parse_line;
///
/// let fields = parse_line("\"Smith, \"\"Bob\"\"\";Ana", ';');
/// assert_eq!(fields, vec!["Smith, \"Bob\"".to_string(), "Ana".to_string()]);
/// ```
pub fn parse_line(line: &str, delimiter: char) -> Vec<String> {
    let mut result = Vec::new();
    let mut current_field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if let Some(&next) = chars.peek() {
                    if next == '"' && in_quotes {
                        // Doubled quote inside a quoted field - one literal quote
                        current_field.push('"');
                        chars.next();
                    } else {
                        in_quotes = !in_quotes;
                    }
                } else {
                    in_quotes = !in_quotes;
                }
            }
            c if c == delimiter && !in_quotes => {
                result.push(current_field.trim().to_string());
                current_field = String::new();
            }
            _ => {
                current_field.push(c);
            }
        }
    }

    // The last field has no trailing delimiter
    result.push(current_field.trim().to_string());
    result
}

/// Guess the delimiter of a delimited text blob from its header line.
///
/// The data files mix `;` and `,` depending on which exporter produced
/// them; whichever character splits the header into more fields wins, with
/// `,` as the tie-break.
pub fn sniff_delimiter(header_line: &str) -> char {
    let semicolons = header_line.matches(';').count();
    let commas = header_line.matches(',').count();
    if semicolons > commas { ';' } else { ',' }
}

/// Parse a full delimited text blob into records.
///
/// The first line supplies the field names; every following non-blank line
/// becomes one record. Lines whose field count differs from the header are
/// dropped with a warning - this matches the historical loader behavior and
/// keeps a single malformed row from poisoning the whole set.
///
/// # Arguments
/// * `text` - The complete CSV text, header line included
/// * `delimiter` - The field separator
///
/// # Returns
/// * `Vec<Record>` - One record per well-formed data line
pub fn parse(text: &str, delimiter: char) -> Vec<Record> {
    let mut lines = text.trim().lines();
    let headers: Vec<String> = match lines.next() {
        Some(header_line) => parse_line(header_line, delimiter),
        None => return Vec::new(),
    };

    let mut records = Vec::new();
    for (line_no, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let values = parse_line(line, delimiter);
        if values.len() != headers.len() {
            warn!(
                "dropping line {}: {} fields, header has {}",
                line_no + 2,
                values.len(),
                headers.len()
            );
            continue;
        }
        records.push(Record::from_pairs(
            headers.iter().cloned().zip(values.into_iter()),
        ));
    }
    records
}

/// Parse a blob, sniffing the delimiter from the header line first.
pub fn parse_auto(text: &str) -> Vec<Record> {
    let delimiter = text
        .trim_start()
        .lines()
        .next()
        .map(sniff_delimiter)
        .unwrap_or(',');
    parse(text, delimiter)
}

/// Escape one value for CSV output.
///
/// Values containing the delimiter, a quote, or a newline are wrapped in
/// quotes with embedded quotes doubled; everything else passes through.
pub fn escape_field(value: &str, delimiter: char) -> String {
    if value.contains(delimiter) || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
