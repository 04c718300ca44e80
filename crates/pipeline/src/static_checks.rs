//! Deterministic checks run on generated code before (and independently of)
//! the model review.
//!
//! These are pattern matches, not parsers. They catch the handful of defects
//! that make generated code unusable outright: an empty answer, a missing
//! program entry point, and an unconditional loop with no `break`.
//!
//! Entry-point rules exist only for languages where a missing `main` means
//! the program cannot run (Java and C/C++). For every other language the
//! entry-point check is simply not available and is skipped.

use std::sync::LazyLock;

use regex::Regex;

use crate::TargetLanguage;

/// Unconditional loop headers: `while (true)`, `while(True):`, `while True:`,
/// `while 1`, `for (;;)`, `loop {`. The parenthesised form accepts any case.
static UNCONDITIONAL_LOOP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"while\s*\(\s*(?i:true|1)\s*\)|while\s+(?:True|1)\s*:|for\s*\(\s*;\s*;\s*\)|\bloop\s*\{")
        .expect("unreachable error: invalid loop pattern")
});

/// A language-conventional program entry point.
struct EntryPointRule {
    languages: &'static [&'static str],
    display: &'static str,
    pattern: &'static LazyLock<Regex>,
    expected: &'static str,
}

static JAVA_MAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"static\s+void\s+main\s*\(").expect("unreachable error: invalid Java main pattern")
});

static C_MAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bmain\s*\(").expect("unreachable error: invalid C main pattern"));

static ENTRY_POINT_RULES: [EntryPointRule; 2] = [
    EntryPointRule {
        languages: &["java"],
        display: "Java",
        pattern: &JAVA_MAIN,
        expected: "public static void main(String[] args)",
    },
    EntryPointRule {
        languages: &["c", "cpp", "c++"],
        display: "C/C++",
        pattern: &C_MAIN,
        expected: "int main()",
    },
];

pub const EMPTY_CODE_ISSUE: &str = "Generated code is empty";

pub const INFINITE_LOOP_ISSUE: &str =
    "Potential infinite loop: unconditional loop with no break statement";

fn entry_point_rule(language: &TargetLanguage) -> Option<&'static EntryPointRule> {
    let key = language.key();
    ENTRY_POINT_RULES
        .iter()
        .find(|rule| rule.languages.contains(&key.as_str()))
}

/// Returns `true` if `code` has an unconditional loop and the text `break`
/// appears nowhere in it, not even inside a longer identifier.
pub fn has_unterminated_loop(code: &str) -> bool {
    UNCONDITIONAL_LOOP.is_match(code) && !code.contains("break")
}

/// Runs every applicable static check and returns the critical issues found,
/// in a fixed order. Empty code short-circuits the other checks.
pub fn run_static_checks(code: &str, language: &TargetLanguage) -> Vec<String> {
    if code.trim().is_empty() {
        return vec![EMPTY_CODE_ISSUE.to_string()];
    }

    let mut issues = Vec::new();

    if let Some(rule) = entry_point_rule(language) {
        if !rule.pattern.is_match(code) {
            issues.push(format!(
                "Missing entry point: {} programs need `{}`",
                rule.display, rule.expected
            ));
        }
    }

    if has_unterminated_loop(code) {
        issues.push(INFINITE_LOOP_ISSUE.to_string());
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lang(s: &str) -> TargetLanguage {
        TargetLanguage::new(s)
    }

    #[test]
    fn empty_code_is_the_only_issue_reported() {
        assert_eq!(run_static_checks("  \n", &lang("java")), [EMPTY_CODE_ISSUE]);
    }

    #[test]
    fn while_true_without_break_is_flagged() {
        let code = "int main() {\n  while (true) {\n    tick();\n  }\n}";
        assert!(has_unterminated_loop(code));
        assert_eq!(run_static_checks(code, &lang("c")), [INFINITE_LOOP_ISSUE]);
    }

    #[test]
    fn break_anywhere_suppresses_the_loop_rule() {
        let code = "while (true) {\n  if (done()) break;\n}";
        assert!(!has_unterminated_loop(code));
        assert!(run_static_checks(code, &lang("javascript")).is_empty());
    }

    #[test]
    fn python_and_rust_loop_forms_are_recognised() {
        assert!(has_unterminated_loop("while True:\n    pass"));
        assert!(has_unterminated_loop("fn main() { loop { spin(); } }"));
        assert!(has_unterminated_loop("for (;;) {}"));
        assert!(!has_unterminated_loop("while x < 10:\n    x += 1"));
    }

    #[test]
    fn parenthesised_python_loop_is_recognised() {
        assert!(has_unterminated_loop("while(True):\n    spin()"));
        assert!(has_unterminated_loop("while (True):\n    spin()"));
        assert!(has_unterminated_loop("while (TRUE) { spin(); }"));
    }

    #[test]
    fn break_inside_an_identifier_still_counts() {
        assert!(!has_unterminated_loop("while (true) { breakable(); }"));
        assert!(!has_unterminated_loop("while True:\n    check_breakpoint()"));
    }

    #[test]
    fn java_without_main_is_flagged() {
        let code = "public class Sum { int add(int a, int b) { return a + b; } }";
        let issues = run_static_checks(code, &lang("Java"));
        assert_eq!(issues.len(), 1);
        assert!(issues[0].starts_with("Missing entry point: Java"));
    }

    #[test]
    fn java_with_main_passes() {
        let code = "public class Sum {\n  public static void main(String[] args) {\n    System.out.println(1 + 2);\n  }\n}";
        assert!(run_static_checks(code, &lang("java")).is_empty());
    }

    #[test]
    fn cpp_aliases_share_one_rule() {
        assert!(entry_point_rule(&lang("C++")).is_some());
        assert!(entry_point_rule(&lang("cpp")).is_some());
        assert!(!run_static_checks("int add(int a, int b);", &lang("c++")).is_empty());
        assert!(run_static_checks("int main (void) { return 0; }", &lang("c")).is_empty());
    }

    #[test]
    fn languages_without_a_rule_skip_the_entry_point_check() {
        assert!(entry_point_rule(&lang("python")).is_none());
        assert!(run_static_checks("def add(a, b):\n    return a + b", &lang("python")).is_empty());
    }
}
