//! Properties of LaTeX text escaping.

use proptest::prelude::*;
use quill_babel::formats::latex::escape::{encode, escape_latex_text, EncodeMode, QuoteState};

/// Braces in `text`, ignoring escaped `\{` and `\}`, are balanced.
fn braces_balanced(text: &str) -> bool {
    let mut depth: i64 = 0;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if matches!(chars.peek(), Some('{') | Some('}')) => {
                chars.next();
            }
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

proptest! {
    #[test]
    fn plain_text_is_unchanged(text in "[a-zA-Z0-9 .,;:!?()'-]*") {
        prop_assert_eq!(escape_latex_text(&text), text);
    }

    #[test]
    fn specials_are_always_escaped(text in "[a-z %#$&_]*") {
        let escaped = escape_latex_text(&text);
        let chars: Vec<char> = escaped.chars().collect();
        for (i, c) in chars.iter().enumerate() {
            if "%#$&_".contains(*c) {
                prop_assert!(i > 0 && chars[i - 1] == '\\', "unescaped {:?} in {:?}", c, escaped);
            }
        }
    }

    #[test]
    fn escaped_braces_stay_balanced(text in r"[a-z{}\\\[\]^~ ]*") {
        let escaped = escape_latex_text(&text);
        prop_assert!(braces_balanced(&escaped), "unbalanced: {:?}", escaped);
    }

    #[test]
    fn literal_block_lines_have_no_spaces(text in "[a-z \"]*") {
        let encoded = encode(&text, EncodeMode::LiteralBlock, &mut QuoteState::default());
        prop_assert!(!encoded.contains(' '));
    }
}

#[test]
fn backslash_is_not_escaped_twice() {
    assert_eq!(escape_latex_text("a\\b{c}"), "a\\textbackslash{}b\\{c\\}");
}

#[test]
fn dashes_and_no_break_space() {
    assert_eq!(escape_latex_text("1\u{2013}2 \u{2014} x\u{a0}y"), "1--2 --- x~y");
}
