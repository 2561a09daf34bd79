//! Command string tokenizer.
//!
//! Turns `autotrace -corner-threshold 90 -output-file "my out.svg" in.png`
//! into a list of option settings. Nothing here touches a [`Command`]; the
//! caller applies the result only once the whole string has parsed.
//!
//! [`Command`]: super::Command

use super::{CommandError, Parameter};

/// One `-name [value]` occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    pub name: String,
    pub value: Option<String>,
}

#[derive(Debug)]
struct Token {
    text: String,
    quoted: bool,
}

impl Token {
    fn is_option(&self) -> bool {
        !self.quoted && self.text.starts_with('-') && !is_number(&self.text)
    }
}

fn is_number(text: &str) -> bool {
    text.parse::<f64>().is_ok()
}

/// Split on whitespace, re-joining double-quoted runs with single spaces.
fn tokenize(command: &str) -> Result<Vec<Token>, CommandError> {
    let mut tokens = Vec::new();
    let mut words = command.split_whitespace();

    while let Some(word) = words.next() {
        let Some(rest) = word.strip_prefix('"') else {
            tokens.push(Token {
                text: word.to_owned(),
                quoted: false,
            });
            continue;
        };

        let mut text = rest.to_owned();
        while !text.ends_with('"') || text.is_empty() && word.len() == 1 {
            let next = words.next().ok_or_else(|| {
                CommandError::Parse(format!("unterminated quote in `{command}`"))
            })?;
            text.push(' ');
            text.push_str(next);
        }
        text.pop();
        tokens.push(Token { text, quoted: true });
    }

    Ok(tokens)
}

/// Parse a command string against the known parameters.
///
/// The leading program token is skipped. A trailing bare token is the input
/// file and is dropped. Flag-style parameters never consume a value.
pub fn parse<'a>(
    command: &str,
    lookup: impl Fn(&str) -> Option<&'a Parameter>,
) -> Result<Vec<Setting>, CommandError> {
    let tokens = tokenize(command)?;
    if tokens.is_empty() {
        return Err(CommandError::Parse("empty command".into()));
    }

    let mut settings = Vec::new();
    let mut iter = tokens.iter().skip(1).peekable();

    while let Some(token) = iter.next() {
        if !token.is_option() {
            if iter.peek().is_none() {
                break;
            }
            return Err(CommandError::Parse(format!(
                "unexpected token `{}`",
                token.text
            )));
        }

        let name = &token.text[1..];
        if name.is_empty() {
            return Err(CommandError::Parse("empty option name".into()));
        }
        let parameter = lookup(name).ok_or_else(|| CommandError::NotFound(name.to_owned()))?;

        let value = if parameter.is_flag() {
            None
        } else {
            iter.next_if(|next| !next.is_option())
                .map(|next| next.text.clone())
        };
        if let Some(value) = &value {
            parameter.check_value(value)?;
        }

        settings.push(Setting {
            name: name.to_owned(),
            value,
        });
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{INPUT_FILE, OUTPUT_FILE};

    fn params() -> Vec<Parameter> {
        vec![
            Parameter::new("centerline", false, ""),
            Parameter::new("corner-threshold", true, "100"),
            Parameter::new("filter-iterations", true, "4"),
            Parameter::new(OUTPUT_FILE, true, ""),
            Parameter::new(INPUT_FILE, true, ""),
        ]
    }

    fn run(command: &str) -> Result<Vec<Setting>, CommandError> {
        let params = params();
        let settings = parse(command, |name| params.iter().find(|p| p.name() == name));
        settings
    }

    fn setting(name: &str, value: Option<&str>) -> Setting {
        Setting {
            name: name.into(),
            value: value.map(Into::into),
        }
    }

    #[test]
    fn test_tokenize_quotes() {
        let tokens = tokenize(r#"autotrace -output-file "my  out.svg" "in.png""#).unwrap();
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["autotrace", "-output-file", "my out.svg", "in.png"]);
        assert!(tokens[2].quoted);
    }

    #[test]
    fn test_tokenize_unterminated() {
        assert!(matches!(
            tokenize(r#"autotrace -output-file "my out.svg"#),
            Err(CommandError::Parse(_))
        ));
        assert!(matches!(tokenize("autotrace \""), Err(CommandError::Parse(_))));
    }

    #[test]
    fn test_tokenize_lone_quote_pair() {
        let tokens = tokenize("autotrace \" \"").unwrap();
        assert_eq!(tokens[1].text, " ");
    }

    #[test]
    fn test_output_file_scenario() {
        let settings = run("autotrace -output-file out.svg in.png").unwrap();
        assert_eq!(settings, [setting(OUTPUT_FILE, Some("out.svg"))]);
    }

    #[test]
    fn test_flag_does_not_consume_input() {
        let settings = run("autotrace -centerline in.png").unwrap();
        assert_eq!(settings, [setting("centerline", None)]);
    }

    #[test]
    fn test_valued_options() {
        let settings =
            run("autotrace -corner-threshold 90 -centerline -filter-iterations 2 in.png").unwrap();
        assert_eq!(
            settings,
            [
                setting("corner-threshold", Some("90")),
                setting("centerline", None),
                setting("filter-iterations", Some("2")),
            ]
        );
    }

    #[test]
    fn test_negative_number_is_a_value() {
        let settings = run("autotrace -corner-threshold -5").unwrap();
        assert_eq!(settings, [setting("corner-threshold", Some("-5"))]);
    }

    #[test]
    fn test_option_without_value() {
        let settings = run("autotrace -corner-threshold -centerline").unwrap();
        assert_eq!(
            settings,
            [setting("corner-threshold", None), setting("centerline", None)]
        );
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(run(""), Err(CommandError::Parse(_))));
        assert!(matches!(run("   "), Err(CommandError::Parse(_))));
    }

    #[test]
    fn test_program_only() {
        assert_eq!(run("autotrace").unwrap(), []);
    }

    #[test]
    fn test_rejects_unknown() {
        assert!(matches!(
            run("autotrace -bogus 1 in.png"),
            Err(CommandError::NotFound(name)) if name == "bogus"
        ));
    }

    #[test]
    fn test_rejects_stray_token() {
        assert!(matches!(
            run("autotrace -centerline stray in.png"),
            Err(CommandError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_value_that_cannot_render_back() {
        assert!(matches!(
            run(r#"autotrace -corner-threshold "9 0" in.png"#),
            Err(CommandError::InvalidValue { name, .. }) if name == "corner-threshold"
        ));
        let settings = run(r#"autotrace -output-file "my out.svg" in.png"#).unwrap();
        assert_eq!(settings, [setting(OUTPUT_FILE, Some("my out.svg"))]);
    }

    #[test]
    fn test_rejects_bare_dash() {
        assert!(matches!(run("autotrace - in.png"), Err(CommandError::Parse(_))));
    }
}
