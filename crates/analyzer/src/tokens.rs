//! 필드 추출기 -- 한 줄의 `key=value` 토큰을 원시 문자열 맵으로 분해
//!
//! 라인을 단일 공백으로 나누고, 각 토큰을 첫 번째 `=`에서만 나눕니다.
//! 값 안의 `=`는 그대로 보존되며, `=`가 없는 토큰은 조용히 버립니다.
//! 따옴표 제거 같은 후처리는 각 필드를 소비하는 쪽의 책임입니다.
//!
//! # 사용 예시
//! ```
//! use logtally_analyzer::tokens::RawTokens;
//!
//! let tokens = RawTokens::parse("metric=cpu value=0.5 query=a=b");
//! assert_eq!(tokens.get("metric"), Some("cpu"));
//! assert_eq!(tokens.get("query"), Some("a=b"));
//! ```

/// 한 라인에서 추출한 원시 토큰
///
/// 라인을 빌려서 만들어지며, 라인 하나를 처리하는 동안만 살아 있습니다.
/// 중복 키는 조회 시 마지막 값이 이기지만, 모든 발생을 순서대로
/// 보존하므로 [`all`](Self::all)로 전부 순회할 수 있습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTokens<'a> {
    pairs: Vec<(&'a str, &'a str)>,
}

impl<'a> RawTokens<'a> {
    /// 라인을 토큰으로 분해합니다.
    pub fn parse(line: &'a str) -> Self {
        let pairs = line
            .split(' ')
            .filter_map(|token| token.split_once('='))
            .collect();
        Self { pairs }
    }

    /// 키의 마지막 값을 반환합니다.
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }

    /// 키의 모든 값을 등장 순서대로 반환합니다.
    pub fn all<'k>(&'k self, key: &'k str) -> impl Iterator<Item = &'a str> + 'k {
        self.pairs
            .iter()
            .filter(move |(k, _)| *k == key)
            .map(|(_, v)| *v)
    }

    /// 키가 하나라도 있는지 확인합니다.
    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| *k == key)
    }

    /// 전체 토큰을 등장 순서대로 순회합니다.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + '_ {
        self.pairs.iter().copied()
    }

    /// 토큰 개수 (중복 포함)
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_simple_pairs() {
        let tokens = RawTokens::parse("metric=cpu_usage value=72.5 host=web-01");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens.get("metric"), Some("cpu_usage"));
        assert_eq!(tokens.get("value"), Some("72.5"));
        assert_eq!(tokens.get("host"), Some("web-01"));
    }

    #[test]
    fn value_keeps_embedded_equals() {
        let tokens = RawTokens::parse("request_url=/search?q=rust&page=2");
        assert_eq!(tokens.get("request_url"), Some("/search?q=rust&page=2"));
    }

    #[test]
    fn tokens_without_equals_are_dropped() {
        let tokens = RawTokens::parse("2024-02-24T16:22:15Z INFO level=INFO");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens.get("level"), Some("INFO"));
    }

    #[test]
    fn last_duplicate_wins_on_lookup() {
        let tokens = RawTokens::parse("level=INFO level=ERROR");
        assert_eq!(tokens.get("level"), Some("ERROR"));
    }

    #[test]
    fn all_returns_every_occurrence_in_order() {
        let tokens = RawTokens::parse("level=INFO message=x level=ERROR");
        let levels: Vec<_> = tokens.all("level").collect();
        assert_eq!(levels, vec!["INFO", "ERROR"]);
    }

    #[test]
    fn quotes_are_not_trimmed() {
        let tokens = RawTokens::parse("request_url=\"/api/status\"");
        assert_eq!(tokens.get("request_url"), Some("\"/api/status\""));
    }

    #[test]
    fn consecutive_spaces_yield_no_tokens() {
        let tokens = RawTokens::parse("a=1  b=2   ");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens.get("b"), Some("2"));
    }

    #[test]
    fn empty_value_is_kept() {
        let tokens = RawTokens::parse("message= level=WARN");
        assert_eq!(tokens.get("message"), Some(""));
        assert!(tokens.contains_key("message"));
    }

    #[test]
    fn empty_line_has_no_tokens() {
        let tokens = RawTokens::parse("");
        assert!(tokens.is_empty());
        assert_eq!(tokens.get("metric"), None);
    }

    #[test]
    fn tab_is_not_a_separator() {
        let tokens = RawTokens::parse("a=1\tb=2");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens.get("a"), Some("1\tb=2"));
    }

    proptest! {
        #[test]
        fn parse_never_panics(line in ".*") {
            let _ = RawTokens::parse(&line);
        }

        #[test]
        fn generated_pairs_are_recovered(
            key in "[a-z_]{1,12}",
            value in "[A-Za-z0-9=/._-]{0,16}",
        ) {
            let line = format!("noise {key}={value} tail");
            let tokens = RawTokens::parse(&line);
            prop_assert_eq!(tokens.get(&key), Some(value.as_str()));
        }
    }
}
