#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|source: &str| {
    if let Ok(tokens) = tinylisp::tokenize(source) {
        let ends = tokens.iter()
            .filter(|token| token.kind == tinylisp::TokenKind::EndOfInput)
            .count();
        assert_eq!(ends, 1);
        assert_eq!(tokens.last().map(|token| token.kind), Some(tinylisp::TokenKind::EndOfInput));

        let _ = tinylisp::parse_tokens(&tokens);
    }
});
