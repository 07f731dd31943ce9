//! End-to-end tests: declarations in, scanned lexemes out

use mll::testing::Scanner;
use mll::{GenerateErrorKind, Generator, GeneratorConfig, LexerTables};

fn id_num_ws() -> LexerTables {
    Generator::new()
        .define_at(3, "digit", "[0-9]")
        .define_at(4, "lower", "[a-z]")
        .pattern_at(6, "ID", "_{lower}{lower}*", "{ token->set_token_type(TOKEN_TYPE_ID); }")
        .pattern_at(7, "NUM", "{digit}{digit}*", "{ token->set_token_type(TOKEN_TYPE_NUM); }")
        .pattern_at(8, "WS", "( |\n)( |\n)*", "{ token->set_ignore(true); }")
        .build()
        .expect("tables should build")
}

#[test]
fn test_end_to_end_scan() {
    let _ = env_logger::builder().is_test(true).try_init();
    let tables = id_num_ws();
    let named = Scanner::new(&tables, "_ab 12").named();
    assert_eq!(named, [("ID", "_ab"), ("WS", " "), ("NUM", "12")]);
}

#[test]
fn test_macro_language() {
    let tables = Generator::new()
        .define("digit", "[0-9]")
        .pattern("num", "{digit}{digit}*", "")
        .build()
        .unwrap();
    let dfa = tables.dfa();

    assert!(dfa.run("0").is_some());
    assert!(dfa.run("42").is_some());
    assert!(dfa.run("").is_none());
    assert!(dfa.run("4a").is_none());

    // the scanner still recognizes the "4" prefix of "4a"
    let first = Scanner::new(&tables, "4a").next().unwrap();
    assert_eq!(first.text, "4");
    assert!(!first.is_error());
}

#[test]
fn test_keyword_declared_first_wins() {
    let tables = Generator::new()
        .pattern("IF", "if", "")
        .pattern("ID", "[a-z][a-z]*", "")
        .pattern("WS", " ", "")
        .build()
        .unwrap();
    let named = Scanner::new(&tables, "if iff i").named();
    assert_eq!(
        named,
        [
            ("IF", "if"),
            ("WS", " "),
            ("ID", "iff"),
            ("WS", " "),
            ("ID", "i"),
        ]
    );
}

#[test]
fn test_multiline_input() {
    let tables = id_num_ws();
    let lexemes: Vec<_> = Scanner::new(&tables, "_x\n 7\n_y").collect();
    let summary: Vec<(&str, usize)> = lexemes.iter().map(|l| (l.text, l.line)).collect();
    assert_eq!(
        summary,
        [("_x", 1), ("\n ", 2), ("7", 2), ("\n", 3), ("_y", 3)]
    );
    assert!(lexemes.last().unwrap().last);
}

#[test]
fn test_declaration_errors_report_lines() {
    let err = Generator::new()
        .define_at(3, "digit", "[0-9]")
        .pattern_at(6, "NUM", "{digit}(", "")
        .build()
        .unwrap_err();
    assert_eq!(err.line, 6);
    assert!(matches!(err.kind, GenerateErrorKind::Parse(_)));
    assert!(err.to_string().starts_with("line 6: NUM: "));
}

#[test]
fn test_config_is_applied() {
    let config = GeneratorConfig::default().with_max_dfa_states(3);
    let generator = Generator::new().with_config(config.clone()).pattern("p", "abcd", "");
    assert_eq!(generator.config(), &config);
    assert!(generator.build().is_err());
}

#[test]
fn test_long_literal_pattern() {
    let word = "ab".repeat(5_000);
    let tables = Generator::new()
        .pattern("long", word.as_str(), "")
        .pattern("a", "a", "")
        .build()
        .unwrap();
    assert_eq!(tables.dfa().len(), word.len() + 1);

    let input = format!("{word}a");
    let named = Scanner::new(&tables, &input).named();
    assert_eq!(named, [("long", word.as_str()), ("a", "a")]);
}

#[test]
fn test_wide_interval_pattern() {
    let tables = Generator::new()
        .pattern("wide", "[a-\u{4ff}][a-\u{4ff}]*", "")
        .build()
        .unwrap();
    let dfa = tables.dfa();
    assert!(dfa.run("\u{436}a\u{4ff}").is_some());
    assert!(dfa.run("\u{500}").is_none());
    assert!(dfa.run("Z").is_none());
}
