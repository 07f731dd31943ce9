#![no_main]
use libfuzzer_sys::fuzz_target;
use mll::regex::{MacroTable, compile};

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    if source.len() > 256 {
        return;
    }

    // Any source either fails cleanly or yields a tree that renders back to
    // an equivalent source.
    if let Ok(ast) = compile(source, &MacroTable::new()) {
        let again = compile(&ast.to_string(), &MacroTable::new());
        assert_eq!(again, Ok(ast));
    }
});
