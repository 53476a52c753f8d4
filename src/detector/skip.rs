// src/detector/skip.rs — "Don't learn this" detection
//
// A disclaimed one-off must never become a rule, so a skip trigger wins over
// every other signal, however strong.

use super::signals::SignalTable;

/// True if the message declares itself a one-off.
pub fn is_skip(message: &str, table: &SignalTable) -> bool {
    table.skip_triggers().iter().any(|re| re.is_match(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skip(msg: &str) -> bool {
        is_skip(msg, &SignalTable::builtin().unwrap())
    }

    #[test]
    fn test_skip_phrases() {
        assert!(skip("just this once, skip the validation"));
        assert!(skip("Don't remember this, it's only for the demo"));
        assert!(skip("do not learn that"));
        assert!(skip("this is an exception, use var here"));
        assert!(skip("it's a one-off script"));
        assert!(skip("one off hack for the release"));
        assert!(skip("this is a temporary fix until the API lands"));
        assert!(skip("disable the check temporarily"));
    }

    #[test]
    fn test_disclaimer_phrasings() {
        assert!(skip("as an exception, use var instead of const here"));
        assert!(skip("An exception for the demo: keep the console.log calls"));
        assert!(skip("it's an exception since the API is legacy"));
        assert!(skip("make an exception for this file"));
        assert!(skip("allow the any type, exception here because of the SDK"));
        assert!(skip("this is only temporary, use var instead of const"));
        assert!(skip("it's just temporary until the refactor lands"));
        assert!(skip("keep the inline styles for now"));
    }

    #[test]
    fn test_ordinary_corrections_are_not_skipped() {
        assert!(!skip("We always use early returns, never nested ifs"));
        assert!(!skip("throw an exception instead of returning null"));
        assert!(!skip("raise an exception when the config is missing"));
        assert!(!skip("put temporary files under /tmp"));
        assert!(!skip("remember to run the linter"));
    }
}
