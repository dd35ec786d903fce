//! Character class rules - lowercase, uppercase, digits, special characters.

use regex::Regex;
use std::sync::LazyLock;

static LOWER_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[a-z]").expect("static lowercase pattern"));
static UPPER_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[A-Z]").expect("static uppercase pattern"));
static DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new("[0-9]").expect("static digit pattern"));
// ASCII punctuation plus space
static SPECIAL_CHAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r##"[ !"#$%&'()*+,\-./:;<=>?@\[\\\]\^_`{|}~]"##).expect("static special pattern")
});

pub fn lower_case_pattern() -> Regex {
    LOWER_CASE.clone()
}

pub fn upper_case_pattern() -> Regex {
    UPPER_CASE.clone()
}

pub fn digit_pattern() -> Regex {
    DIGIT.clone()
}

pub fn special_char_pattern() -> Regex {
    SPECIAL_CHAR.clone()
}
