#![no_main]
use libfuzzer_sys::fuzz_target;
use mll::testing::Scanner;
use mll::{Generator, GeneratorConfig};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let mut parts = text.splitn(2, '\u{0}');
    let (Some(regex), Some(input)) = (parts.next(), parts.next()) else {
        return;
    };
    if regex.len() > 64 {
        return;
    }

    let generator = Generator::new()
        .with_config(GeneratorConfig::default().with_max_dfa_states(4096))
        .pattern("p", regex, "")
        .pattern("any", "a|b|c", "");
    let Ok(tables) = generator.build() else {
        return;
    };

    // Scanning never loses or duplicates input
    let scanned: String = Scanner::new(&tables, input).map(|lexeme| lexeme.text).collect();
    assert_eq!(scanned, input);
});
