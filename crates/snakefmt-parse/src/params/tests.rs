use super::*;
use crate::Language;
use facet_testhelpers::test;
use snakefmt_tokenizer::Tokenizer;

fn parse_shape(source: &str, shape: ParamShape) -> Result<ParameterList<'_>> {
    let dialect = Dialect::default();
    let vocabulary = Language::snakemake_rule();
    let mut tokens = Tokenizer::new(source);
    let keyword = tokens.next().unwrap();
    shape.parse(&keyword, 1, &vocabulary, &dialect, &mut tokens)
}

fn parse_list(source: &str) -> Result<ParameterList<'_>> {
    parse_shape(source, ParamShape::List)
}

fn values(params: &[Parameter]) -> Vec<&str> {
    params.iter().map(|p| p.value.as_str()).collect()
}

#[test]
fn test_positional() {
    let list = parse_list("input: a, b, c\n").unwrap();
    assert_eq!(list.keyword(), "input");
    assert_eq!(values(list.positional()), ["a", "b", "c"]);
    assert!(list.keyed().is_empty());
    assert_eq!(list.len(), 3);
    assert!(list.eof());
}

#[test]
fn test_keyed() {
    let list = parse_list("params: x = 1, y = 2\n").unwrap();
    let keys: Vec<_> = list.keyed().iter().map(|p| p.key.as_str()).collect();
    assert_eq!(keys, ["x", "y"]);
    assert_eq!(values(list.keyed()), ["1", "2"]);
    assert!(list.positional().is_empty());
}

#[test]
fn test_positional_before_keyed() {
    let list = parse_list("input: 'a.txt', ref = 'b.txt'\n").unwrap();
    let all: Vec<_> = list.all().map(|p| (p.key.as_str(), p.value.as_str())).collect();
    assert_eq!(all, [("", "'a.txt'"), ("ref", "'b.txt'")]);
    assert!(list.all().all(|p| p.is_string));
}

#[test]
fn test_brackets_hide_commas_and_equals() {
    let list = parse_list("input: f(a, b), c\n").unwrap();
    assert_eq!(values(list.positional()), ["f( a, b)", "c"]);

    let list = parse_list("params: d = dict(a = 1, b = [2, 3])\n").unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list.keyed()[0].key, "d");
    assert_eq!(list.keyed()[0].value, "dict( a=1, b=[2,3])");
}

#[test]
fn test_multiline_list_hands_back_exit_token() {
    let list = parse_list("input:\n    'a',\n    'b'\noutput: 'c'\n").unwrap();
    assert_eq!(values(list.positional()), ["'a'", "'b'"]);
    assert_eq!(list.token().text, "output");
    assert_eq!(list.depth(), 0);
    assert!(!list.eof());
}

#[test]
fn test_comments_attach_to_parameter() {
    let list = parse_list("input: 'a', # first\n    'b'\n").unwrap();
    assert!(list.positional()[0].comments.is_empty());
    assert_eq!(list.positional()[1].comments, ["# first"]);
}

#[test]
fn test_no_parameters() {
    let error = parse_list("threads:\n").unwrap_err();
    assert_eq!(error.kind, SyntaxErrorKind::NoParameters);
    assert_eq!(error.message, "In threads definition.");

    let error = parse_list("message:\noutput: 'x'\n").unwrap_err();
    assert_eq!(error.kind, SyntaxErrorKind::NoParameters);
    assert_eq!(error.message, "In message definition.");
}

#[test]
fn test_empty_parameters() {
    let list = parse_list("input: a,,b\n").unwrap();
    assert_eq!(values(list.positional()), ["a", "", "b"]);

    let list = parse_list("input: a, b,\n").unwrap();
    assert_eq!(values(list.positional()), ["a", "b"]);
}

#[test]
fn test_invalid_keys() {
    let error = parse_list("input: = 'file'\n").unwrap_err();
    assert_eq!(error.kind, SyntaxErrorKind::InvalidParameterSyntax);
    assert_eq!(error.message, "Operator = used with no preceding key");

    let error = parse_list("input: 2 = 'file'\n").unwrap_err();
    assert_eq!(error.kind, SyntaxErrorKind::InvalidParameterSyntax);
    assert_eq!(error.message, "Invalid key 2");
}

#[test]
fn test_over_indented_keyword() {
    let error = parse_list("input: 'a',\n    output: 'b'\n").unwrap_err();
    assert_eq!(error.kind, SyntaxErrorKind::InvalidParameterSyntax);
    assert_eq!(error.message, "Over-indented recognised keyword found: 'output'");
}

#[test]
fn test_single_param() {
    let single = SingleParam::parse(
        &Tokenizer::new("threads").next().unwrap(),
        1,
        &Language::snakemake_rule(),
        &Dialect::default(),
        &mut Tokenizer::new(": 4\n"),
    )
    .unwrap();
    assert_eq!(single.param().value, "4");
    assert_eq!(single.len(), 1);
    let (positional, keyed) = single.into_inner().into_parts();
    assert_eq!((positional.len(), keyed.len()), (1, 0));

    let error = parse_shape("threads: 4, 5\n", ParamShape::Single).unwrap_err();
    assert_eq!(error.kind, SyntaxErrorKind::TooManyParameters);
    assert_eq!(error.message, "threads definition expects a single parameter");

    let error = parse_shape("singularity: a = 'x'\n", ParamShape::Single).unwrap_err();
    assert_eq!(error.kind, SyntaxErrorKind::InvalidParameter);
    assert_eq!(
        error.message,
        "singularity definition requires a positional (not key/value) parameter"
    );
}

#[test]
fn test_no_keyword_list() {
    let mut tokens = Tokenizer::new("localrules: a, b\n");
    let keyword = tokens.next().unwrap();
    let list = NoKeywordParamList::parse(
        &keyword,
        1,
        &Language::snakemake(),
        &Dialect::default(),
        &mut tokens,
    )
    .unwrap();
    assert_eq!(values(list.positional()), ["a", "b"]);
    let (positional, keyed) = list.into_inner().into_parts();
    assert_eq!(values(&positional), ["a", "b"]);
    assert!(keyed.is_empty());

    let error = parse_shape("localrules: a, b = c\n", ParamShape::NoKeyword).unwrap_err();
    assert_eq!(error.kind, SyntaxErrorKind::InvalidParameterSyntax);
    assert_eq!(
        error.message,
        "localrules definition does not accept key/value parameters"
    );
}

#[test]
fn test_line_breaks_inside_brackets() {
    let list = parse_list("input: f(a,\n  b), c\n").unwrap();
    assert_eq!(values(list.positional()), ["f(a, b)", "c"]);
    assert!(list.eof());
}

#[test]
fn test_invalid_token() {
    let error = parse_list("input: 'a\n").unwrap_err();
    assert_eq!(error.kind, SyntaxErrorKind::InvalidToken);
    assert_eq!(error.message, "Unterminated string literal 'a");
}

#[test]
fn test_depth_floors_at_zero() {
    let source = "if a:\n    if b:\n        input: 'x'\nz\n";
    let vocabulary = Language::snakemake_rule();
    let dialect = Dialect::default();

    let mut tokens = Tokenizer::new(source);
    let keyword = tokens.by_ref().find(|t| t.text == "input").unwrap();
    let list = ParameterList::parse(&keyword, 1, &vocabulary, &dialect, &mut tokens).unwrap();
    assert_eq!(list.depth(), 0);
    assert_eq!(list.token().text, "z");
    assert!(!list.eof());
    assert_eq!(values(list.positional()), ["'x'"]);

    let mut tokens = Tokenizer::new(source);
    let keyword = tokens.by_ref().find(|t| t.text == "input").unwrap();
    let list = ParameterList::parse(&keyword, 0, &vocabulary, &dialect, &mut tokens).unwrap();
    assert_eq!(list.depth(), 0);
    assert!(list.eof());
    assert_eq!(values(list.positional()), ["'x' z"]);
}

mod properties {
    use super::{parse_list, values};
    use crate::SyntaxErrorKind;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn empty_parameters_dropped_only_at_end(
            items in prop::collection::vec(prop::option::of("[a-z]{1,5}"), 1..6)
        ) {
            let items: Vec<String> = items.into_iter().map(Option::unwrap_or_default).collect();
            let source = format!("input: {}\n", items.join(","));

            let mut expected: Vec<&str> = items.iter().map(String::as_str).collect();
            if expected.last() == Some(&"") {
                expected.pop();
            }

            match parse_list(&source) {
                Ok(list) => prop_assert_eq!(values(list.positional()), expected),
                Err(error) => {
                    prop_assert!(expected.is_empty());
                    prop_assert_eq!(error.kind, SyntaxErrorKind::NoParameters);
                }
            }
        }
    }
}
