//! Reader for `.mll` lexer description files.
//!
//! ```text
//! _manifest:
//! #define TOKEN_TYPE_ID 2
//! _defines:
//! lower %{[a-z]}%
//! _patterns:
//! id %{_{lower}{lower}*}% #{ token->set_token_type(TOKEN_TYPE_ID); }#
//! ```
//!
//! The manifest is copied verbatim into the generated header. Each define
//! and pattern line starts with a name, then a space, then the regex between
//! `%{` and `}%`. Pattern lines carry action code between `#{` and `}#`; the
//! action keeps its enclosing braces so it can serve as a function body.

use crate::error::{InputError, InputErrorKind, ToolError};
use mll::regex::normalize_escapes;
use mll::{Generator, GeneratorConfig, MacroDecl, PatternDecl};
use std::path::Path;

const MANIFEST_LABEL: &str = "_manifest:";
const DEFINES_LABEL: &str = "_defines:";
const PATTERNS_LABEL: &str = "_patterns:";

/// Parsed contents of an `.mll` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LexerSource {
    pub manifest: String,
    pub macros: Vec<MacroDecl>,
    pub patterns: Vec<PatternDecl>,
}

impl LexerSource {
    /// A generator holding every declaration, in file order.
    #[must_use]
    pub fn generator(&self, config: GeneratorConfig) -> Generator {
        let generator = self
            .macros
            .iter()
            .fold(Generator::new().with_config(config), |g, m| {
                g.define_at(m.line, m.name.clone(), m.regex.clone())
            });
        self.patterns.iter().fold(generator, |g, p| {
            g.pattern_at(p.line, p.name.clone(), p.regex.clone(), p.action.clone())
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Start,
    Manifest,
    Defines,
    Patterns,
}

/// Read and parse an `.mll` file.
///
/// # Errors
///
/// Fails if the file name lacks the `.mll` extension, the file cannot be
/// read, or its contents are malformed.
pub fn read_file(path: &Path) -> Result<LexerSource, ToolError> {
    if path.extension().is_none_or(|ext| ext != "mll") {
        return Err(ToolError::BadExtension(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path).map_err(|err| ToolError::io(path, err))?;
    log::debug!("read {} bytes from {}", text.len(), path.display());
    Ok(parse_source(&text)?)
}

/// Parse the text of an `.mll` file.
///
/// # Errors
///
/// Returns the first malformed line. A missing section label is reported on
/// the line where the label was expected.
pub fn parse_source(text: &str) -> Result<LexerSource, InputError> {
    let mut source = LexerSource::default();
    let mut section = Section::Start;
    let mut last_line = 0;

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        last_line = line;
        let trimmed = raw.trim();

        match section {
            Section::Start => {
                if trimmed != MANIFEST_LABEL {
                    return Err(InputError::new(line, InputErrorKind::MissingLabel(MANIFEST_LABEL)));
                }
                section = Section::Manifest;
            }
            Section::Manifest if raw.contains(DEFINES_LABEL) => {
                expect_label(trimmed, DEFINES_LABEL, line)?;
                section = Section::Defines;
            }
            Section::Manifest => {
                source.manifest.push_str(raw);
                source.manifest.push('\n');
            }
            Section::Defines if raw.contains(PATTERNS_LABEL) => {
                expect_label(trimmed, PATTERNS_LABEL, line)?;
                section = Section::Patterns;
            }
            _ if trimmed.is_empty() => {}
            Section::Defines => {
                let (name, regex) = split_declaration(trimmed, line)?;
                source.macros.push(MacroDecl {
                    name: name.into(),
                    regex,
                    line,
                });
            }
            Section::Patterns => {
                let (name, regex) = split_declaration(trimmed, line)?;
                if !is_identifier(name) {
                    return Err(InputError::new(line, InputErrorKind::InvalidName(name.to_owned())));
                }
                let action = extract_action(trimmed, line)?;
                source.patterns.push(PatternDecl {
                    name: name.into(),
                    regex,
                    action: action.to_owned(),
                    line,
                });
            }
        }
    }

    let missing = match section {
        Section::Start => Some(MANIFEST_LABEL),
        Section::Manifest => Some(DEFINES_LABEL),
        Section::Defines => Some(PATTERNS_LABEL),
        Section::Patterns => None,
    };
    if let Some(label) = missing {
        return Err(InputError::new(last_line + 1, InputErrorKind::MissingLabel(label)));
    }

    log::debug!(
        "parsed {} defines and {} patterns",
        source.macros.len(),
        source.patterns.len()
    );
    Ok(source)
}

fn expect_label(trimmed: &str, label: &'static str, line: usize) -> Result<(), InputError> {
    if trimmed == label {
        Ok(())
    } else {
        Err(InputError::new(line, InputErrorKind::MissingLabel(label)))
    }
}

/// Byte offset of the only occurrence of `needle` in `line`.
fn find_unique(line: &str, needle: &str) -> Option<usize> {
    let mut matches = line.match_indices(needle).map(|(idx, _)| idx);
    match (matches.next(), matches.next()) {
        (Some(idx), None) => Some(idx),
        _ => None,
    }
}

/// Split `name %{regex}%` into the name and the regex, with `\n` and `\t`
/// in the regex turned into newline and tab.
fn split_declaration(line: &str, line_no: usize) -> Result<(&str, String), InputError> {
    let ill_formed = || InputError::new(line_no, InputErrorKind::IllFormedDeclaration);

    let space = line.find(' ').ok_or_else(ill_formed)?;
    let open = find_unique(line, "%{").ok_or_else(ill_formed)?;
    let close = find_unique(line, "}%").ok_or_else(ill_formed)?;
    if close < open + 2 || space > open {
        return Err(ill_formed());
    }

    let name = &line[..space];
    let regex = normalize_escapes(&line[open + 2..close]);
    Ok((name, regex))
}

/// The action code of a pattern line: the text from the `{` of `#{` through
/// the `}` of `}#`.
fn extract_action(line: &str, line_no: usize) -> Result<&str, InputError> {
    let ill_formed = || InputError::new(line_no, InputErrorKind::IllFormedAction);

    let open = find_unique(line, "#{").ok_or_else(ill_formed)?;
    let close = find_unique(line, "}#").ok_or_else(ill_formed)?;
    if close < open {
        return Err(ill_formed());
    }
    Ok(&line[open + 1..=close])
}

/// Whether `name` can be used as a C++ function name.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
_manifest:
#define TOKEN_TYPE_WS 2
#define TOKEN_TYPE_ID 3
_defines:
lower %{[a-z]}%

digit %{[0-9]}%
_patterns:
id %{_{lower}{lower}*}% #{ token->set_token_type(TOKEN_TYPE_ID); }#
ws %{( |\\n)( |\\n)*}% #{ token->set_ignore(true); }#
";

    #[test]
    fn test_parse_sample() {
        let source = parse_source(SAMPLE).unwrap();
        assert_eq!(source.manifest, "#define TOKEN_TYPE_WS 2\n#define TOKEN_TYPE_ID 3\n");
        assert_eq!(source.macros.len(), 2);
        assert_eq!(source.macros[0].name, "lower");
        assert_eq!(source.macros[0].regex, "[a-z]");
        assert_eq!(source.macros[1].line, 7);

        let id = &source.patterns[0];
        assert_eq!(id.name, "id");
        assert_eq!(id.regex, "_{lower}{lower}*");
        assert_eq!(id.action, "{ token->set_token_type(TOKEN_TYPE_ID); }");
        assert_eq!(id.line, 9);
        assert_eq!(source.patterns[1].regex, "( |\n)( |\n)*");
    }

    #[test]
    fn test_generator_from_source() {
        let source = parse_source(SAMPLE).unwrap();
        let tables = source.generator(GeneratorConfig::default()).build().unwrap();
        assert_eq!(tables.patterns().len(), 2);
        assert_eq!(tables.patterns()[1].line, 10);
    }

    #[test]
    fn test_missing_labels() {
        let err = parse_source("manifest\n").unwrap_err();
        assert_eq!(err, InputError::new(1, InputErrorKind::MissingLabel(MANIFEST_LABEL)));

        let err = parse_source("_manifest:\ncode\n").unwrap_err();
        assert_eq!(err, InputError::new(3, InputErrorKind::MissingLabel(DEFINES_LABEL)));

        let err = parse_source("_manifest:\n_defines:\na %{a}%\n").unwrap_err();
        assert_eq!(err.kind, InputErrorKind::MissingLabel(PATTERNS_LABEL));

        let err = parse_source("").unwrap_err();
        assert_eq!(err, InputError::new(1, InputErrorKind::MissingLabel(MANIFEST_LABEL)));

        let err = parse_source("_manifest:\nx _defines: y\n").unwrap_err();
        assert_eq!(err, InputError::new(2, InputErrorKind::MissingLabel(DEFINES_LABEL)));
    }

    #[test]
    fn test_ill_formed_declarations() {
        let wrap = |line: &str| format!("_manifest:\n_defines:\n{line}\n_patterns:\n");
        for line in ["a%{a}%", "a %{a}% %{b}%", "a %{a", "a }%a%{", "%{a}% a"] {
            let err = parse_source(&wrap(line)).unwrap_err();
            assert_eq!(err, InputError::new(3, InputErrorKind::IllFormedDeclaration), "{line:?}");
        }
    }

    #[test]
    fn test_ill_formed_actions() {
        let wrap = |line: &str| format!("_manifest:\n_defines:\n_patterns:\n{line}\n");
        for line in ["p %{a}%", "p %{a}% #{ x; }", "p %{a}% }# #{", "p %{a}% #{ #{ }#"] {
            let err = parse_source(&wrap(line)).unwrap_err();
            assert_eq!(err, InputError::new(4, InputErrorKind::IllFormedAction), "{line:?}");
        }
        let err = parse_source(&wrap("9p %{a}% #{ }#")).unwrap_err();
        assert_eq!(err.kind, InputErrorKind::InvalidName("9p".into()));
    }

    #[test]
    fn test_extension_is_checked() {
        let err = read_file(Path::new("lexer.txt")).unwrap_err();
        assert!(matches!(err, ToolError::BadExtension(_)));
    }
}
