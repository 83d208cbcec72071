use crate::error::ParseError;
use crate::fields::{
    column, optional, parse_features, parse_index, parse_number, parse_secondary_edges, split_columns,
    Governor, LineIndex, FIELD_COUNT,
};
use quaestio_protocol::{Dependency, Features, Relation, Token, TokenIndex};
use quaestio_semgraph::{DependencyGraph, GraphBuilder};
use std::iter::{Enumerate, Peekable};
use std::str::Lines;
use tracing::{debug, trace};

/// Reads `text` lazily, one sentence per item, in input order.
pub fn parse_sentences(text: &str) -> SentenceReader<'_> {
    SentenceReader::new(text)
}

/// One-shot iterator over the sentences of an annotation text.
///
/// Sentences are separated by one or more blank lines. Each item is either the
/// sentence's graph or the first error found in it; an error never stops the
/// iteration. Blocks holding only comments produce no item.
pub struct SentenceReader<'a> {
    lines: Peekable<Enumerate<Lines<'a>>>,
}

impl<'a> SentenceReader<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { lines: text.lines().enumerate().peekable() }
    }

    /// Next run of non-blank lines with their 1-based line numbers.
    fn next_block(&mut self) -> Option<Vec<(usize, &'a str)>> {
        while self.lines.next_if(|(_, line)| is_blank(line)).is_some() {}

        let mut block = Vec::new();
        while let Some((i, line)) = self.lines.next_if(|(_, line)| !is_blank(line)) {
            block.push((i + 1, line));
        }
        (!block.is_empty()).then_some(block)
    }
}

impl<'a> Iterator for SentenceReader<'a> {
    type Item = Result<DependencyGraph, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let block = self.next_block()?;
            match parse_block(&block) {
                Ok(Some(graph)) => return Some(Ok(graph)),
                Ok(None) => continue,
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Edges of one data line, resolved once every token of the sentence is known.
struct PendingEdges<'a> {
    line: usize,
    dependent: TokenIndex,
    head: Option<u32>,
    relation: Option<&'a str>,
    secondary: Vec<(u32, &'a str)>,
}

fn parse_block(block: &[(usize, &str)]) -> Result<Option<DependencyGraph>, ParseError> {
    let mut builder = GraphBuilder::new();
    let mut pending = Vec::new();
    let mut saw_data = false;

    for &(line, text) in block {
        if let Some(comment) = text.strip_prefix('#') {
            builder.comment(comment.trim());
            continue;
        }
        saw_data = true;

        let columns = split_columns(text);
        if columns.len() != FIELD_COUNT {
            return Err(ParseError::FieldCount { line, found: columns.len() });
        }

        let index = match parse_index(columns[column::INDEX]) {
            Some(LineIndex::Word(index)) if index > 0 => index,
            Some(LineIndex::Range(..)) | Some(LineIndex::Empty(..)) => {
                trace!(line, index = columns[column::INDEX], "skipping non-word line");
                continue;
            }
            _ => {
                return Err(ParseError::InvalidIndex { line, value: columns[column::INDEX].to_string() });
            }
        };

        let expected = builder.token_count() as u32 + 1;
        if index < expected {
            return Err(ParseError::DuplicateIndex { line, index });
        }
        if index > expected {
            return Err(ParseError::NonContiguousIndex { line, expected, found: index });
        }

        let head = match optional(columns[column::HEAD]) {
            None => None,
            Some(value) => Some(
                parse_number(value).ok_or_else(|| ParseError::InvalidHead { line, value: value.to_string() })?,
            ),
        };

        let feats = parse_features(columns[column::FEATS]).ok_or_else(|| ParseError::InvalidFeatures {
            line,
            value: columns[column::FEATS].to_string(),
        })?;

        let secondary = parse_secondary_edges(columns[column::DEPS]).ok_or_else(|| {
            ParseError::InvalidSecondaryEdge { line, value: columns[column::DEPS].to_string() }
        })?;

        let relation = optional(columns[column::DEPREL]);
        let token = Token {
            index: TokenIndex::new(index),
            form: columns[column::FORM].to_string(),
            lemma: optional(columns[column::LEMMA]).map(str::to_string),
            upos: optional(columns[column::UPOS]).map(str::to_string),
            xpos: optional(columns[column::XPOS]).map(str::to_string),
            feats,
            head: head.map(TokenIndex::new),
            deprel: relation.map(Relation::from),
            misc: parse_misc(columns[column::MISC]),
        };
        builder.add_token(token)?;

        pending.push(PendingEdges {
            line,
            dependent: TokenIndex::new(index),
            head,
            relation,
            secondary: secondary
                .into_iter()
                .filter_map(|edge| match edge.governor {
                    Governor::Word(governor) => Some((governor, edge.relation)),
                    Governor::Empty => None,
                })
                .collect(),
        });
    }

    if builder.token_count() == 0 {
        return match (saw_data, block.first()) {
            (true, Some(&(line, _))) => Err(ParseError::EmptySentence { line }),
            _ => Ok(None),
        };
    }

    let count = builder.token_count() as u32;
    for edges in pending {
        let PendingEdges { line, dependent, head, relation, secondary } = edges;

        if let Some(governor) = head {
            if governor > count {
                return Err(ParseError::DanglingHead { line, governor });
            }
            if governor != 0 {
                let relation = Relation::from(relation.unwrap_or(Relation::UNSPECIFIED));
                builder.add_dependency(Dependency::primary(TokenIndex::new(governor), dependent, relation))?;
            }
        }

        for (governor, relation) in secondary {
            if governor > count {
                return Err(ParseError::DanglingHead { line, governor });
            }
            // `0:root` restates the root attachment; the root is not a node
            if governor != 0 {
                builder.add_dependency(Dependency::secondary(
                    TokenIndex::new(governor),
                    dependent,
                    Relation::from(relation),
                ))?;
            }
        }
    }

    let graph = builder.build()?;
    debug!(tokens = graph.len(), sent_id = ?graph.sent_id(), "parsed sentence");
    Ok(Some(graph))
}

/// The metadata column is free-form in practice; keep it verbatim when it isn't `key=value` shaped.
fn parse_misc(field: &str) -> Features {
    parse_features(field).unwrap_or_else(|| {
        let mut misc = Features::new();
        misc.insert(field, "");
        misc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use quaestio_protocol::EdgeKind;

    const WANN_KOMMST_DU: &str = "\
# sent_id = 1
# text = Wann kommst du?
1\tWann\twann\tADV\tPWAV\t_\t2\tmo\t_\t_
2\tkommst\tkommen\tVERB\tVVFIN\tMood=Ind|Number=Sing|Person=2\t0\tROOT\t_\t_
3\tdu\tdu\tPRON\tPPER\tCase=Nom|Person=2\t2\tsb\t_\tSpaceAfter=No
4\t?\t?\tPUNCT\t$.\t_\t2\tpunct\t_\t_
";

    const DU_KOMMST: &str = "\
1\tDu\tdu\tPRON\tPPER\t_\t2\tsb\t_\t_
2\tkommst\tkommen\tVERB\tVVFIN\t_\t0\tROOT\t_\t_
";

    #[test]
    fn test_single_sentence() {
        let graphs: Vec<_> = parse_sentences(WANN_KOMMST_DU).collect();
        assert_eq!(graphs.len(), 1);

        let graph = graphs[0].as_ref().unwrap();
        assert_eq!(graph.sentence_text(), "Wann kommst du ?");
        assert_eq!(graph.detokenized_text(), "Wann kommst du?");
        assert_eq!(graph.sent_id(), Some("1"));
        assert_eq!(graph.original_text(), Some("Wann kommst du?"));

        let verb = graph.token(TokenIndex(2)).unwrap();
        assert_eq!(verb.lemma.as_deref(), Some("kommen"));
        assert_eq!(verb.fine_pos(), Some("VVFIN"));
        assert_eq!(verb.feature("Person"), Some("2"));
        assert!(verb.is_root());

        // The root attachment produces no edge
        assert_eq!(graph.edges().count(), 3);
        assert!(graph.has_edge(TokenIndex(2), TokenIndex(3), "sb", Some(EdgeKind::Primary)));
    }

    #[test]
    fn test_sentences_in_order_with_extra_blank_lines() {
        let text = format!("\n\n{}\n\n   \n{}\n", WANN_KOMMST_DU, DU_KOMMST);
        let texts: Vec<String> = parse_sentences(&text).map(|g| g.unwrap().sentence_text()).collect();
        assert_eq!(texts, vec!["Wann kommst du ?", "Du kommst"]);
    }

    #[test]
    fn test_malformed_sentence_is_skipped_not_fatal() {
        let broken = "1\tkaputt\n";
        let text = format!("{}\n{}\n{}", WANN_KOMMST_DU, broken, DU_KOMMST);

        let items: Vec<_> = parse_sentences(&text).collect();
        assert_eq!(items.len(), 3);
        assert!(items[0].is_ok());
        assert_eq!(items[1], Err(ParseError::FieldCount { line: 8, found: 2 }));
        assert_eq!(items[2].as_ref().unwrap().sentence_text(), "Du kommst");
    }

    #[test]
    fn test_line_errors() {
        let bad_index = "x\tDu\t_\t_\t_\t_\t0\tROOT\t_\t_\n";
        assert!(matches!(
            parse_sentences(bad_index).next(),
            Some(Err(ParseError::InvalidIndex { line: 1, .. }))
        ));

        let bad_head = "1\tDu\t_\t_\t_\t_\tzwei\tsb\t_\t_\n";
        assert_eq!(
            parse_sentences(bad_head).next(),
            Some(Err(ParseError::InvalidHead { line: 1, value: "zwei".into() }))
        );

        let dangling = "1\tDu\t_\t_\t_\t_\t5\tsb\t_\t_\n";
        assert_eq!(
            parse_sentences(dangling).next(),
            Some(Err(ParseError::DanglingHead { line: 1, governor: 5 }))
        );

        let gap = "1\tDu\t_\t_\t_\t_\t0\tROOT\t_\t_\n3\tda\t_\t_\t_\t_\t1\tmo\t_\t_\n";
        assert_eq!(
            parse_sentences(gap).next(),
            Some(Err(ParseError::NonContiguousIndex { line: 2, expected: 2, found: 3 }))
        );

        let duplicate = "1\tDu\t_\t_\t_\t_\t0\tROOT\t_\t_\n1\tda\t_\t_\t_\t_\t1\tmo\t_\t_\n";
        assert_eq!(
            parse_sentences(duplicate).next(),
            Some(Err(ParseError::DuplicateIndex { line: 2, index: 1 }))
        );

        let bad_deps = "1\tDu\t_\t_\t_\t_\t0\tROOT\tsb\t_\n";
        assert!(matches!(
            parse_sentences(bad_deps).next(),
            Some(Err(ParseError::InvalidSecondaryEdge { line: 1, .. }))
        ));
    }

    #[test]
    fn test_multiword_ranges_and_empty_nodes_are_skipped() {
        let text = "\
1-2\tzum\t_\t_\t_\t_\t_\t_\t_\t_
1\tzu\tzu\tADP\tAPPR\t_\t0\tROOT\t_\t_
2\tdem\tder\tDET\tART\t_\t3\tnk\t_\t_
3\tHaus\tHaus\tNOUN\tNN\t_\t1\tnk\t1:nk|2.1:dep\t_
2.1\tnull\t_\t_\t_\t_\t_\t_\t_\t_
";
        let graph = parse_sentences(text).next().unwrap().unwrap();
        assert_eq!(graph.sentence_text(), "zu dem Haus");
        assert_eq!(graph.edges().filter(|d| d.kind == EdgeKind::Secondary).count(), 1);
    }

    #[test]
    fn test_secondary_edges_add_governors() {
        let text = "\
1\tEr\ter\tPRON\tPPER\t_\t2\tsb\t4:sb\t_
2\tkam\tkommen\tVERB\tVVFIN\t_\t0\tROOT\t0:root\t_
3\tund\tund\tCCONJ\tKON\t_\t2\tcd\t_\t_
4\tsah\tsehen\tVERB\tVVFIN\t_\t3\tcj\t_\t_
";
        let graph = parse_sentences(text).next().unwrap().unwrap();

        let governors: Vec<&str> = graph.governors(TokenIndex(1)).iter().map(|t| t.form.as_str()).collect();
        assert_eq!(governors, vec!["kam", "sah"]);
        assert!(graph.has_edge(TokenIndex(4), TokenIndex(1), "sb", Some(EdgeKind::Secondary)));
    }

    #[test]
    fn test_comment_only_blocks_and_empty_input() {
        assert!(parse_sentences("").next().is_none());
        assert!(parse_sentences("\n \n").next().is_none());
        assert!(parse_sentences("# newdoc id = x\n").next().is_none());

        let ranges_only = "1-2\tzum\t_\t_\t_\t_\t_\t_\t_\t_\n";
        assert_eq!(
            parse_sentences(ranges_only).next(),
            Some(Err(ParseError::EmptySentence { line: 1 }))
        );
    }

    #[test]
    fn test_reader_is_one_shot() {
        let mut reader = parse_sentences(DU_KOMMST);
        assert!(reader.next().is_some());
        assert!(reader.next().is_none());
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_rendered_graph_parses_back_identically() {
        let graph = parse_sentences(WANN_KOMMST_DU).next().unwrap().unwrap();
        let reparsed = parse_sentences(&graph.to_conllu()).next().unwrap().unwrap();
        assert_eq!(graph, reparsed);
    }

    #[test]
    fn test_free_form_misc_is_kept() {
        let text = "1\tJa\tja\tITJ\tITJ\t_\t0\tROOT\t_\tstart of turn\n";
        let graph = parse_sentences(text).next().unwrap().unwrap();
        let token = graph.token(TokenIndex(1)).unwrap();
        assert_eq!(token.misc.to_string(), "start of turn");
    }

    fn annotation(forms: &[String]) -> String {
        forms
            .iter()
            .enumerate()
            .map(|(i, form)| {
                let head = if i == 0 { 0 } else { 1 };
                format!("{}\t{}\t_\tX\t_\t_\t{}\tdep\t_\t_\n", i + 1, form, head)
            })
            .collect()
    }

    proptest! {
        #[test]
        fn prop_surface_forms_round_trip(
            sentences in prop::collection::vec(
                prop::collection::vec("[A-Za-zäöüÄÖÜß]{1,10}|[.,?!;]", 1..12),
                1..5,
            )
        ) {
            let text: String = sentences
                .iter()
                .map(|forms| annotation(forms))
                .collect::<Vec<_>>()
                .join("\n");

            let parsed: Vec<String> = parse_sentences(&text)
                .map(|graph| graph.unwrap().sentence_text())
                .collect();
            let expected: Vec<String> = sentences.iter().map(|forms| forms.join(" ")).collect();
            prop_assert_eq!(parsed, expected);
        }
    }
}
