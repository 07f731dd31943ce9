use mll_tools::cli::{Commands, Limits};
use mll_tools::commands::{load, run};
use mll_tools::{ToolError, generate_dot};
use std::fs;
use std::path::PathBuf;

const C_LIKE: &str = "\
_manifest:
#define TOKEN_TYPE_KEYWORD 2
#define TOKEN_TYPE_ID 3
#define TOKEN_TYPE_NUM 4
_defines:
digit %{[0-9]}%
lower %{[a-z]}%
_patterns:
kw_while %{while}% #{ token->set_token_type(TOKEN_TYPE_KEYWORD); }#
id %{{lower}({lower}|{digit})*}% #{ token->set_token_type(TOKEN_TYPE_ID); }#
num %{{digit}{digit}*}% #{ token->set_token_type(TOKEN_TYPE_NUM); }#
ws %{( |\\n|\\t)( |\\n|\\t)*}% #{ token->set_ignore(true); }#
";

const LIMITS: Limits = Limits {
    max_dfa_states: 1024,
    deny_nullable: false,
};

fn scratch_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("mll-{test}-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_input(dir: &PathBuf, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn test_generate_writes_header_and_source() {
    let dir = scratch_dir("generate");
    let input = write_input(&dir, "clike.mll", C_LIKE);

    run(Commands::Generate {
        input,
        out_dir: dir.clone(),
        name: None,
        limits: LIMITS,
    })
    .unwrap();

    let header = fs::read_to_string(dir.join("clike.h")).unwrap();
    let source = fs::read_to_string(dir.join("clike.cpp")).unwrap();
    assert!(header.contains("#ifndef CLIKE_H"));
    assert!(header.contains("#define TOKEN_TYPE_NUM 4"));
    assert!(header.contains("class Lexer {"));
    assert!(source.contains("#include \"clike.h\""));
    assert!(source.contains("static void kw_while(std::shared_ptr<Token> token)"));
    assert!(source.contains("{ token->set_ignore(true); }"));

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn test_keyword_wins_over_identifier() {
    let dir = scratch_dir("keyword");
    let input = write_input(&dir, "clike.mll", C_LIKE);
    let (_, tables) = load(&input, LIMITS).unwrap();

    let accept = tables.dfa().run("while").unwrap();
    assert_eq!(tables.pattern(accept).unwrap().name, "kw_while");
    let accept = tables.dfa().run("whilst").unwrap();
    assert_eq!(tables.pattern(accept).unwrap().name, "id");

    let dot = generate_dot(&tables);
    assert!(dot.contains("kw_while"));

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn test_tables_json() {
    let dir = scratch_dir("tables");
    let input = write_input(&dir, "clike.mll", C_LIKE);
    let output = dir.join("tables.json");

    run(Commands::Tables {
        input,
        output: Some(output.clone()),
        limits: LIMITS,
    })
    .unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap();
    assert_eq!(json["patterns"].as_array().unwrap().len(), 4);
    assert_eq!(json["patterns"][0]["name"], "kw_while");
    assert!(json["dfa"]["states"].as_array().unwrap().len() > 1);

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn test_errors_carry_lines() {
    let dir = scratch_dir("errors");

    let input = write_input(&dir, "bad.mll", "_manifest:\n_defines:\n_patterns:\nid %{[a-}% #{ }#\n");
    let err = run(Commands::Dot {
        input,
        output: None,
        limits: LIMITS,
    })
    .unwrap_err();
    assert!(matches!(err, ToolError::Generate(_)));
    assert!(err.report().starts_with("Line 4: \nid: "));

    let input = write_input(&dir, "bad.txt", C_LIKE);
    let err = load(&input, LIMITS).unwrap_err();
    assert!(matches!(err, ToolError::BadExtension(_)));

    let err = load(&dir.join("missing.mll"), LIMITS).unwrap_err();
    assert!(matches!(err, ToolError::Io { .. }));
    assert_eq!(err.line(), None);

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn test_state_limit_is_reported() {
    let dir = scratch_dir("limit");
    let input = write_input(&dir, "clike.mll", C_LIKE);
    let limits = Limits {
        max_dfa_states: 2,
        deny_nullable: false,
    };
    let err = load(&input, limits).unwrap_err();
    assert_eq!(err.line(), None);
    assert!(err.report().contains('2'));

    fs::remove_dir_all(dir).unwrap();
}
