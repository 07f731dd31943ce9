//! C++ code emitter.
//!
//! Produces a header/source pair implementing a direct-coded scanner: one
//! labelled block per DFA state, each reading a character and jumping to the
//! next state through a `switch`. A stack of visited states, cleared on every
//! accepting state, lets the scanner back up to the longest accepted prefix.

use crate::error::EmitError;
use mll::{LexerTables, StateId};
use std::fmt;
use std::path::{Path, PathBuf};

/// Emits the scanner for one set of tables.
#[derive(Debug, Clone, Copy)]
pub struct Emitter<'a> {
    tables: &'a LexerTables,
    manifest: &'a str,
    base_name: &'a str,
}

impl<'a> Emitter<'a> {
    /// # Errors
    ///
    /// Fails if a transition symbol does not fit in a C++ `char`, or if
    /// `base_name` cannot name the output files.
    pub fn new(tables: &'a LexerTables, manifest: &'a str, base_name: &'a str) -> Result<Self, EmitError> {
        if base_name.is_empty() || base_name.contains(['/', '\\', '"']) {
            return Err(EmitError::InvalidBaseName(base_name.to_owned()));
        }
        for (idx, state) in (0u32..).zip(tables.dfa().states()) {
            if let Some(&(symbol, _)) = state.transitions.iter().find(|(c, _)| u32::from(*c) > 0xFF) {
                return Err(EmitError::UnsupportedSymbol { symbol, state: idx });
            }
        }
        Ok(Self {
            tables,
            manifest,
            base_name,
        })
    }

    #[must_use]
    pub fn header_name(&self) -> String {
        format!("{}.h", self.base_name)
    }

    #[must_use]
    pub fn source_name(&self) -> String {
        format!("{}.cpp", self.base_name)
    }

    /// Contents of the header file.
    #[must_use]
    pub const fn header(&self) -> Header<'_> {
        Header(self)
    }

    /// Contents of the source file.
    #[must_use]
    pub const fn source(&self) -> Source<'_> {
        Source(self)
    }

    /// Write both files into `dir`, returning their paths.
    ///
    /// # Errors
    ///
    /// Returns the first I/O failure with the path it occurred on.
    pub fn write_to(&self, dir: &Path) -> Result<(PathBuf, PathBuf), (PathBuf, std::io::Error)> {
        let header = dir.join(self.header_name());
        let source = dir.join(self.source_name());
        std::fs::write(&header, self.header().to_string()).map_err(|err| (header.clone(), err))?;
        std::fs::write(&source, self.source().to_string()).map_err(|err| (source.clone(), err))?;
        log::info!("wrote {} and {}", header.display(), source.display());
        Ok((header, source))
    }

    fn guard(&self) -> String {
        let mut guard: String = self
            .base_name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
            .collect();
        guard.push_str("_H");
        guard
    }
}

/// C++ character literal for a byte-sized symbol.
#[must_use]
pub fn char_literal(c: char) -> String {
    match c {
        '\n' => "'\\n'".to_owned(),
        '\t' => "'\\t'".to_owned(),
        '\r' => "'\\r'".to_owned(),
        '\\' => "'\\\\'".to_owned(),
        '\'' => "'\\''".to_owned(),
        ' '..='~' => format!("'{c}'"),
        _ => format!("'\\x{:02x}'", u32::from(c)),
    }
}

const TOKEN_CLASS: &str = r#"class Token {
	uint16_t token_type;
	std::string lexeme;
	// Is this the last token of the stream.
	bool last;
	// Line on which the lexeme ends.
	int line;
	// Whether this token should be skipped by get_next_word.
	bool ignore;
public:
	Token(std::string lexeme = "", uint16_t token_type = TOKEN_TYPE_DEFAULT, bool last = false, int line = 0, bool ignore = false)
		: token_type(token_type), lexeme(lexeme), last(last), line(line), ignore(ignore) {}

	void set_token_type(uint16_t token_type) { this->token_type = token_type; }
	void set_ignore(bool ignore) { this->ignore = ignore; }
	void set_lexeme(std::string lexeme) { this->lexeme = lexeme; }
	void set_last(bool last) { this->last = last; }

	const std::string& get_lexeme() const { return this->lexeme; }
	bool is_last() const { return this->last; }
	uint16_t get_token_type() const { return this->token_type; }
	bool is_ignore() const { return this->ignore; }
	int get_line() const { return this->line; }
};
"#;

const LEXER_CLASS: &str = r"class Lexer {
	// Input file.
	std::ifstream filestream;
	// Current DFA state.
	States state;
	// Visited states, for backing up to the last accepting state.
	std::stack<States> states_stack;
	// Current line of the input file.
	int line{1};

	// Next character of the input file, or EOF.
	int next_char() { return this->filestream.get(); }
	// Push the last character back into the input file.
	void rollback() {
		this->filestream.clear();
		this->filestream.seekg(-1, std::ios_base::cur);
	}
	static constexpr bool is_accepting_state(States);
	static constexpr bool is_newline(char c) { return c == '\n'; }
	// Scan the longest word at the current position.
	std::shared_ptr<Token> next_word();
public:
	Lexer() = delete;
	Lexer(const Lexer&) = delete;
	Lexer(Lexer&&) = delete;
	explicit Lexer(const char* input_file) { this->filestream.open(input_file, std::ios::binary); }
	~Lexer() { this->filestream.close(); }
	Lexer& operator=(const Lexer&) = delete;
	Lexer& operator=(Lexer&&) = delete;
	// Next token that is not ignored.
	std::shared_ptr<Token> get_next_word();
};
";

/// Display adapter rendering the header file.
pub struct Header<'e>(&'e Emitter<'e>);

impl fmt::Display for Header<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let emitter = self.0;
        let guard = emitter.guard();

        writeln!(f, "#ifndef {guard}")?;
        writeln!(f, "#define {guard}")?;
        writeln!(f)?;
        for include in ["string", "fstream", "stack", "memory", "ostream", "cstdint"] {
            writeln!(f, "#include <{include}>")?;
        }
        writeln!(f)?;
        writeln!(f, "#define TOKEN_TYPE_ERROR 0")?;
        writeln!(f, "#define TOKEN_TYPE_DEFAULT 1")?;
        writeln!(f)?;

        f.write_str(emitter.manifest)?;
        if !emitter.manifest.is_empty() && !emitter.manifest.ends_with('\n') {
            writeln!(f)?;
        }

        writeln!(f)?;
        writeln!(f, "// One lexeme of the input file.")?;
        f.write_str(TOKEN_CLASS)?;
        writeln!(f)?;
        writeln!(f, "std::ostream& operator<<(std::ostream& os, const Token& tok);")?;
        writeln!(f)?;

        writeln!(f, "// States of the lexer DFA.")?;
        writeln!(f, "enum class States : uint32_t {{")?;
        for idx in 0..emitter.tables.dfa().len() {
            if idx == 0 {
                writeln!(f, "\tS0 = 0,")?;
            } else {
                writeln!(f, "\tS{idx},")?;
            }
        }
        writeln!(f, "\tSE,")?;
        writeln!(f, "\tBAD")?;
        writeln!(f, "}};")?;
        writeln!(f)?;

        writeln!(f, "// Splits the input file into tokens.")?;
        f.write_str(LEXER_CLASS)?;
        writeln!(f)?;
        writeln!(f, "#endif // {guard}")
    }
}

/// Display adapter rendering the source file.
pub struct Source<'e>(&'e Emitter<'e>);

impl Source<'_> {
    fn write_actions(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pattern in self.0.tables.patterns().iter().filter(|p| p.has_action()) {
            writeln!(f, "// {} (line {})", pattern.name, pattern.line)?;
            writeln!(f, "static void {}(std::shared_ptr<Token> token)", pattern.name)?;
            writeln!(f, "{}", pattern.action)?;
            writeln!(f)?;
        }
        Ok(())
    }

    fn write_is_accepting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "constexpr bool Lexer::is_accepting_state(States s) {{")?;
        writeln!(f, "\treturn (false")?;
        for state in self.0.tables.accepting() {
            writeln!(f, "\t\t|| s == States::{state}")?;
        }
        writeln!(f, "\t);")?;
        writeln!(f, "}}")?;
        writeln!(f)
    }

    fn write_state(&self, f: &mut fmt::Formatter<'_>, id: StateId) -> fmt::Result {
        let state = self.0.tables.dfa().state(id);

        writeln!(f, "{id}:")?;
        writeln!(f, "\tthis->state = States::{id};")?;
        writeln!(f, "\tch = this->next_char();")?;
        writeln!(f, "\tif (ch == std::char_traits<char>::eof()) {{")?;
        writeln!(f, "\t\tlast = true;")?;
        writeln!(f, "\t\tgoto SOut;")?;
        writeln!(f, "\t}}")?;
        writeln!(f, "\tc = static_cast<char>(ch);")?;
        writeln!(f, "\tif (this->is_newline(c))")?;
        writeln!(f, "\t\tthis->line++;")?;
        writeln!(f, "\tlexeme.push_back(c);")?;
        if state.is_accepting() {
            writeln!(f, "\twhile (!this->states_stack.empty())")?;
            writeln!(f, "\t\tthis->states_stack.pop();")?;
        }
        writeln!(f, "\tthis->states_stack.push(this->state);")?;
        writeln!(f)?;

        writeln!(f, "\tswitch (c) {{")?;
        for &(symbol, target) in &state.transitions {
            writeln!(f, "\tcase {}:", char_literal(symbol))?;
            writeln!(f, "\t\tgoto {target};")?;
        }
        writeln!(f, "\tdefault:")?;
        writeln!(f, "\t\tthis->state = States::SE;")?;
        writeln!(f, "\t\tgoto SOut;")?;
        writeln!(f, "\t}}")?;
        writeln!(f)
    }

    fn write_next_word(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tables = self.0.tables;

        writeln!(f, "std::shared_ptr<Token> Lexer::next_word() {{")?;
        writeln!(f, "\tbool last{{false}};")?;
        writeln!(f, "\tstd::string lexeme;")?;
        writeln!(f, "\tint ch;")?;
        writeln!(f, "\tchar c;")?;
        writeln!(f)?;
        writeln!(f, "\tif (this->filestream.peek() == std::char_traits<char>::eof())")?;
        writeln!(
            f,
            "\t\treturn std::make_shared<Token>(lexeme, TOKEN_TYPE_DEFAULT, true, this->line, false);"
        )?;
        writeln!(f)?;
        writeln!(f, "\twhile (!this->states_stack.empty())")?;
        writeln!(f, "\t\tthis->states_stack.pop();")?;
        writeln!(f, "\tthis->states_stack.push(States::BAD);")?;
        writeln!(f)?;

        for idx in 0..tables.dfa().len() {
            self.write_state(f, StateId(u32::try_from(idx).map_err(|_| fmt::Error)?))?;
        }

        f.write_str(
            "SOut:
	while (!this->is_accepting_state(this->state) && this->state != States::BAD) {
		this->state = this->states_stack.top();
		this->states_stack.pop();
		if (this->state == States::BAD)
			break;
		if (!lexeme.empty()) {
			if (this->is_newline(lexeme.back()))
				this->line--;
			lexeme.pop_back();
			this->rollback();
			last = false;
		}
	}

	if (this->state == States::BAD || lexeme.empty()) {
		// Nothing accepted, or only the empty word: consume one character as an error token.
		ch = this->next_char();
		if (ch != std::char_traits<char>::eof()) {
			c = static_cast<char>(ch);
			if (this->is_newline(c))
				this->line++;
			lexeme.push_back(c);
		}
		last = this->filestream.peek() == std::char_traits<char>::eof();
		return std::make_shared<Token>(lexeme, TOKEN_TYPE_ERROR, last, this->line, false);
	}

	std::shared_ptr<Token> tok{std::make_shared<Token>(lexeme, TOKEN_TYPE_DEFAULT, last, this->line, false)};
	switch (this->state) {
",
        )?;
        for pattern in tables.patterns().iter().filter(|p| p.has_action()) {
            for state in &pattern.dfa_accepting_states {
                writeln!(f, "\tcase States::{state}:")?;
            }
            if !pattern.dfa_accepting_states.is_empty() {
                writeln!(f, "\t\t{}(tok);", pattern.name)?;
                writeln!(f, "\t\tbreak;")?;
            }
        }
        writeln!(f, "\tdefault:")?;
        writeln!(f, "\t\tbreak;")?;
        writeln!(f, "\t}}")?;
        writeln!(f, "\treturn tok;")?;
        writeln!(f, "}}")
    }
}

impl fmt::Display for Source<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "#include <string>")?;
        writeln!(f, "#include \"{}\"", self.0.header_name())?;
        writeln!(f)?;

        f.write_str(
            "std::ostream& operator<<(std::ostream& os, const Token& tok) {
	os << \"Token type: \" << tok.get_token_type() << std::endl;
	os << \"Lexeme: \" << tok.get_lexeme() << std::endl;
	os << \"Line: \" << tok.get_line() << std::endl;
	if (tok.is_last())
		os << \"Last\" << std::endl;
	return os;
}

",
        )?;

        self.write_actions(f)?;
        self.write_is_accepting(f)?;

        f.write_str(
            "std::shared_ptr<Token> Lexer::get_next_word() {
	std::shared_ptr<Token> tok;
	while ((tok = this->next_word())->is_ignore() && !tok->is_last());
	return tok;
}

",
        )?;

        self.write_next_word(f)
    }
}

/// Render both files into strings, for callers that do not write to disk.
#[must_use]
pub fn render(emitter: &Emitter<'_>) -> (String, String) {
    (emitter.header().to_string(), emitter.source().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mll::Generator;

    fn tables() -> LexerTables {
        Generator::new()
            .define("lower", "[a-z]")
            .pattern("ID", "_{lower}{lower}*", "{ token->set_token_type(3); }")
            .pattern("NUM", "[0-9][0-9]*", "{ token->set_token_type(4); }")
            .pattern("WS", "( |\n)( |\n)*", "{ token->set_ignore(true); }")
            .pattern("QUIET", "\\*", "")
            .build()
            .unwrap()
    }

    #[test]
    fn test_char_literals() {
        assert_eq!(char_literal('a'), "'a'");
        assert_eq!(char_literal('\n'), "'\\n'");
        assert_eq!(char_literal('\''), "'\\''");
        assert_eq!(char_literal('\\'), "'\\\\'");
        assert_eq!(char_literal('\u{e9}'), "'\\xe9'");
    }

    #[test]
    fn test_header_declares_every_state() {
        let tables = tables();
        let emitter = Emitter::new(&tables, "#define TOKEN_TYPE_ID 3\n", "my_little_lexer").unwrap();
        let header = emitter.header().to_string();

        assert!(header.starts_with("#ifndef MY_LITTLE_LEXER_H\n#define MY_LITTLE_LEXER_H\n"));
        assert!(header.contains("#define TOKEN_TYPE_ERROR 0\n#define TOKEN_TYPE_DEFAULT 1\n"));
        assert!(header.contains("#define TOKEN_TYPE_ID 3\n"));
        let last = tables.dfa().len() - 1;
        assert!(header.contains(&format!("\tS{last},\n\tSE,\n\tBAD\n")));
        assert!(header.trim_end().ends_with("#endif // MY_LITTLE_LEXER_H"));
    }

    #[test]
    fn test_source_structure() {
        let tables = tables();
        let emitter = Emitter::new(&tables, "", "lex").unwrap();
        let (_, source) = render(&emitter);

        assert!(source.contains("#include \"lex.h\""));
        assert!(source.contains("static void ID(std::shared_ptr<Token> token)\n{ token->set_token_type(3); }"));
        assert!(!source.contains("void QUIET("));
        for idx in 0..tables.dfa().len() {
            assert!(source.contains(&format!("\nS{idx}:\n")), "missing label S{idx}");
        }
        for state in tables.accepting() {
            assert!(source.contains(&format!("\t\t|| s == States::{state}\n")));
        }
        assert!(source.contains("\tcase '\\n':\n"));
        assert!(source.contains("\t\tWS(tok);\n"));
        assert!(source.contains("SOut:\n"));
    }

    #[test]
    fn test_dispatch_covers_accepting_states_with_actions() {
        let tables = tables();
        let (_, source) = render(&Emitter::new(&tables, "", "lex").unwrap());
        let dispatch = source.split("switch (this->state) {").nth(1).unwrap();
        for pattern in tables.patterns().iter().filter(|p| p.has_action()) {
            for state in &pattern.dfa_accepting_states {
                assert!(dispatch.contains(&format!("\tcase States::{state}:\n")));
            }
        }
    }

    #[test]
    fn test_token_class_has_default_arguments() {
        let tables = tables();
        let header = Emitter::new(&tables, "", "lex").unwrap().header().to_string();
        assert!(header.contains("Token(std::string lexeme = \"\", uint16_t token_type = TOKEN_TYPE_DEFAULT,"));
        assert!(header.contains("\tint get_line() const { return this->line; }\n};\n"));
    }

    #[test]
    fn test_empty_match_takes_error_path() {
        let tables = Generator::new()
            .pattern("ID", "[a-z][a-z]*", "{ token->set_token_type(3); }")
            .pattern("WS", "( )*", "{ token->set_ignore(true); }")
            .build()
            .unwrap();
        assert!(tables.is_accepting(tables.dfa().start()));

        let (_, source) = render(&Emitter::new(&tables, "", "lex").unwrap());
        assert!(source.contains("\t\t|| s == States::S0\n"));

        let sout = source.split("SOut:\n").nth(1).unwrap();
        let error_path = sout
            .find("\tif (this->state == States::BAD || lexeme.empty()) {\n")
            .unwrap();
        let error_return = sout
            .find("return std::make_shared<Token>(lexeme, TOKEN_TYPE_ERROR, last, this->line, false);")
            .unwrap();
        let dispatch = sout.find("switch (this->state) {").unwrap();
        assert!(error_path < error_return && error_return < dispatch);
        assert!(sout[error_path..error_return].contains("ch = this->next_char();"));
    }

    #[test]
    fn test_rejects_wide_symbols() {
        let tables = Generator::new().pattern("p", "\u{3bb}", "").build().unwrap();
        assert!(matches!(
            Emitter::new(&tables, "", "lex"),
            Err(EmitError::UnsupportedSymbol { symbol: '\u{3bb}', state: 0 })
        ));
        let tables = Generator::new().pattern("p", "a", "").build().unwrap();
        assert!(Emitter::new(&tables, "", "a/b").is_err());
    }
}
