use nom::{
    branch::alt,
    bytes::complete::{take_till, take_till1},
    character::complete::{char, u32 as number},
    combinator::{all_consuming, map, opt},
    multi::separated_list1,
    sequence::{pair, preceded, separated_pair},
    IResult,
};
use quaestio_protocol::Features;

/// Marks an absent value in any column.
pub const PLACEHOLDER: &str = "_";

/// index, form, lemma, coarse POS, fine POS, features, head, relation, secondary edges, metadata
pub const FIELD_COUNT: usize = 10;

/// Column positions within a data line.
pub mod column {
    pub const INDEX: usize = 0;
    pub const FORM: usize = 1;
    pub const LEMMA: usize = 2;
    pub const UPOS: usize = 3;
    pub const XPOS: usize = 4;
    pub const FEATS: usize = 5;
    pub const HEAD: usize = 6;
    pub const DEPREL: usize = 7;
    pub const DEPS: usize = 8;
    pub const MISC: usize = 9;
}

/// What the index column of a data line denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineIndex {
    /// A regular token (`3`).
    Word(u32),
    /// A multi-word token range (`3-4`); its parts follow as words.
    Range(u32, u32),
    /// An empty node of the enhanced graph (`5.1`).
    Empty(u32, u32),
}

/// Governor of a secondary edge. Empty nodes are not part of the basic graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Governor {
    Word(u32),
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecondaryEdge<'a> {
    pub governor: Governor,
    pub relation: &'a str,
}

fn line_index(input: &str) -> IResult<&str, LineIndex> {
    alt((
        map(separated_pair(number, char('-'), number), |(a, b)| LineIndex::Range(a, b)),
        map(separated_pair(number, char('.'), number), |(a, b)| LineIndex::Empty(a, b)),
        map(number, LineIndex::Word),
    ))(input)
}

fn feature(input: &str) -> IResult<&str, (&str, &str)> {
    map(
        pair(
            take_till1(|c: char| c == '=' || c == '|'),
            opt(preceded(char('='), take_till(|c: char| c == '|'))),
        ),
        |(name, value)| (name, value.unwrap_or("")),
    )(input)
}

fn secondary_edge(input: &str) -> IResult<&str, SecondaryEdge<'_>> {
    map(
        separated_pair(
            alt((
                map(separated_pair(number, char('.'), number), |_| Governor::Empty),
                map(number, Governor::Word),
            )),
            char(':'),
            take_till1(|c: char| c == '|'),
        ),
        |(governor, relation)| SecondaryEdge { governor, relation },
    )(input)
}

/// Splits a data line into its tab-separated columns.
pub fn split_columns(line: &str) -> Vec<&str> {
    line.split('\t').collect()
}

pub fn parse_index(field: &str) -> Option<LineIndex> {
    all_consuming(line_index)(field).ok().map(|(_, index)| index)
}

/// An unsigned decimal that fills the whole column.
pub fn parse_number(field: &str) -> Option<u32> {
    all_consuming(number::<&str, nom::error::Error<&str>>)(field)
        .ok()
        .map(|(_, n)| n)
}

/// `Name=Value|Flag|...`; the placeholder yields no features.
pub fn parse_features(field: &str) -> Option<Features> {
    if field == PLACEHOLDER {
        return Some(Features::new());
    }

    let (_, pairs) = all_consuming(separated_list1(char('|'), feature))(field).ok()?;
    Some(
        pairs
            .into_iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect(),
    )
}

/// `governor:relation|governor:relation`; the placeholder yields no edges.
pub fn parse_secondary_edges(field: &str) -> Option<Vec<SecondaryEdge<'_>>> {
    if field == PLACEHOLDER {
        return Some(Vec::new());
    }

    all_consuming(separated_list1(char('|'), secondary_edge))(field)
        .ok()
        .map(|(_, edges)| edges)
}

/// `None` for the placeholder, the column text otherwise.
pub fn optional(field: &str) -> Option<&str> {
    (field != PLACEHOLDER).then_some(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_kinds() {
        assert_eq!(parse_index("7"), Some(LineIndex::Word(7)));
        assert_eq!(parse_index("3-4"), Some(LineIndex::Range(3, 4)));
        assert_eq!(parse_index("5.1"), Some(LineIndex::Empty(5, 1)));
        assert_eq!(parse_index("x"), None);
        assert_eq!(parse_index("3-"), None);
        assert_eq!(parse_index(""), None);
    }

    #[test]
    fn test_number_must_fill_column() {
        assert_eq!(parse_number("0"), Some(0));
        assert_eq!(parse_number("12"), Some(12));
        assert_eq!(parse_number("12a"), None);
        assert_eq!(parse_number("-1"), None);
    }

    #[test]
    fn test_features() {
        let feats = parse_features("Case=Nom|Number=Sing|Foreign").unwrap();
        assert_eq!(feats.len(), 3);
        assert_eq!(feats.get("Case"), Some("Nom"));
        assert_eq!(feats.get("Foreign"), Some(""));

        // Only the first '=' separates name from value
        assert_eq!(parse_features("Gloss=a=b").unwrap().get("Gloss"), Some("a=b"));

        assert!(parse_features("_").unwrap().is_empty());
        assert!(parse_features("=Nom").is_none());
        assert!(parse_features("Case=Nom||Number=Sing").is_none());
    }

    #[test]
    fn test_secondary_edges() {
        let edges = parse_secondary_edges("2:sb|4:nsubj:pass|5.1:obj").unwrap();
        assert_eq!(
            edges,
            vec![
                SecondaryEdge { governor: Governor::Word(2), relation: "sb" },
                SecondaryEdge { governor: Governor::Word(4), relation: "nsubj:pass" },
                SecondaryEdge { governor: Governor::Empty, relation: "obj" },
            ]
        );

        assert!(parse_secondary_edges("_").unwrap().is_empty());
        assert!(parse_secondary_edges("sb").is_none());
        assert!(parse_secondary_edges("2:").is_none());
    }

    #[test]
    fn test_optional_placeholder() {
        assert_eq!(optional("_"), None);
        assert_eq!(optional("VERB"), Some("VERB"));
    }
}
