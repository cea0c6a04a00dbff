//! Plain-text dialogue scripts
//!
//! One directive per line:
//!
//! ```text
//! # comment
//! @section [area]
//! @period <actor>
//! @emote <name>
//! @br
//! @end
//! any other line is spoken text, whitespace included
//! \@ at line start escapes a literal @
//! ```

use crate::sequencer::Sequencer;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("line {line}: unknown directive '@{name}'")]
    UnknownDirective { line: usize, name: String },

    #[error("line {line}: '@{name}' needs an argument")]
    MissingArgument { line: usize, name: &'static str },
}

/// One parsed script line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Section(Option<String>),
    Period(String),
    Emote(String),
    Br,
    EndSection,
    Talk(String),
}

fn required(line: usize, name: &'static str, arg: Option<&str>) -> Result<String, ScriptError> {
    arg.map(str::to_string)
        .ok_or(ScriptError::MissingArgument { line, name })
}

/// Parse a whole script
pub fn parse_script(text: &str) -> Result<Vec<Directive>, ScriptError> {
    let mut directives = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        // Spoken text keeps its surrounding whitespace
        if trimmed.starts_with("\\@") {
            let indent = raw.len() - raw.trim_start().len();
            let text = format!("{}{}", &raw[..indent], &raw[indent + 1..]);
            directives.push(Directive::Talk(text));
            continue;
        }

        let Some(body) = trimmed.strip_prefix('@') else {
            directives.push(Directive::Talk(raw.to_string()));
            continue;
        };

        let (name, arg) = match body.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, Some(rest.trim()).filter(|a| !a.is_empty())),
            None => (body, None),
        };

        let directive = match name {
            "section" => Directive::Section(arg.map(str::to_string)),
            "period" => Directive::Period(required(line, "period", arg)?),
            "emote" => Directive::Emote(required(line, "emote", arg)?),
            "br" => Directive::Br,
            "end" => Directive::EndSection,
            other => {
                return Err(ScriptError::UnknownDirective {
                    line,
                    name: other.to_string(),
                })
            }
        };
        directives.push(directive);
    }
    Ok(directives)
}

/// Apply parsed directives to a sequencer
pub fn apply(directives: &[Directive], seq: &mut Sequencer) {
    for directive in directives {
        match directive {
            Directive::Section(area) => {
                seq.section(area.as_deref());
            }
            Directive::Period(actor) => {
                seq.period(actor);
            }
            Directive::Emote(name) => {
                seq.emote(name);
            }
            Directive::Br => {
                seq.br();
            }
            Directive::EndSection => {
                seq.end_section();
            }
            Directive::Talk(text) => {
                seq.talk(text);
            }
        }
    }
}
