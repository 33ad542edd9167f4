#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sufx::tree::GeneralizedSuffixTree;

#[derive(Arbitrary, Debug)]
struct Input {
    strings: Vec<String>,
    queries: Vec<String>,
    /// Compact after the string at this index
    compact_at: Option<u8>,
}

fuzz_target!(|input: Input| {
    // Keep inputs small enough for the naive checks
    let strings: Vec<&str> = input
        .strings
        .iter()
        .take(8)
        .map(|s| s.as_str())
        .filter(|s| s.chars().count() <= 64)
        .collect();

    let mut tree = GeneralizedSuffixTree::new();
    for (i, s) in strings.iter().enumerate() {
        tree.add(s).unwrap();
        if input.compact_at == Some(i as u8) {
            tree.compact();
        }
    }

    let added: Vec<&str> = strings.iter().copied().filter(|s| !s.is_empty()).collect();
    let mut expected: Vec<(String, usize)> = added
        .iter()
        .enumerate()
        .flat_map(|(source, s)| s.char_indices().map(move |(i, _)| (s[i..].to_string(), source)))
        .collect();
    expected.sort();

    let all: Vec<(String, usize)> = tree.all().map(|s| (s.text(), s.source())).collect();
    assert_eq!(all, expected);

    for query in input.queries.iter().take(16) {
        let is_substring = added.iter().any(|s| s.contains(query.as_str()));
        let is_suffix = added.iter().any(|s| s.ends_with(query.as_str()));
        assert_eq!(tree.contains(query), is_substring || query.is_empty());
        assert_eq!(tree.contains_suffix(query), is_suffix);

        let prefixed: Vec<&(String, usize)> =
            expected.iter().filter(|(s, _)| s.starts_with(query.as_str())).collect();
        assert_eq!(tree.count(query), prefixed.len());
    }
});
