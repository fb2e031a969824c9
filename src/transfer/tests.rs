use super::*;
use pretty_assertions::assert_eq;

fn ranges(pairs: &[(u64, u64)]) -> RangeSet {
    pairs
        .iter()
        .map(|&(start, end)| BlockRange::new(start, end))
        .collect()
}

#[test]
fn rangeset_keeps_source_order() {
    let set = RangeSet::parse("6,10,12,0,1,5,6").unwrap();
    assert_eq!(set, ranges(&[(10, 12), (0, 1), (5, 6)]));
    assert_eq!(set.len(), 3);
    assert_eq!(set.max_end(), Some(12));
    assert_eq!(set.block_count(), 4);
}

#[test]
fn rangeset_single_pair() {
    let set: RangeSet = "2,0,1".parse().unwrap();
    assert_eq!(set, ranges(&[(0, 1)]));
}

#[test]
fn rangeset_tolerates_trailing_newline() {
    let set = RangeSet::parse("4,0,1,5,6\n").unwrap();
    assert_eq!(set, ranges(&[(0, 1), (5, 6)]));
}

#[test]
fn rangeset_zero_count_is_empty() {
    let set = RangeSet::parse("0").unwrap();
    assert!(set.is_empty());
    assert_eq!(set.max_end(), None);
}

#[test]
fn rangeset_count_mismatch() {
    let err = RangeSet::parse("3,0,1").unwrap_err();
    assert!(matches!(
        err,
        RangeSetError::CountMismatch {
            declared: 3,
            actual: 2
        }
    ));
}

#[test]
fn rangeset_count_too_small() {
    assert!(matches!(
        RangeSet::parse("2,0,1,5,6"),
        Err(RangeSetError::CountMismatch {
            declared: 2,
            actual: 4
        })
    ));
}

#[test]
fn rangeset_odd_bound_count() {
    assert!(matches!(
        RangeSet::parse("3,0,1,2"),
        Err(RangeSetError::UnpairedBound { count: 3 })
    ));
}

#[test]
fn rangeset_rejects_garbage() {
    assert!(matches!(
        RangeSet::parse("2,0,x"),
        Err(RangeSetError::InvalidInteger { token }) if token == "x"
    ));
    assert!(matches!(
        RangeSet::parse("2,-1,4"),
        Err(RangeSetError::InvalidInteger { .. })
    ));
    assert!(matches!(RangeSet::parse(""), Err(RangeSetError::Empty)));
}

#[test]
fn rangeset_does_not_check_order_within_pair() {
    let set = RangeSet::parse("2,9,3").unwrap();
    let range = *set.iter().next().unwrap();
    assert_eq!(range, BlockRange::new(9, 3));
    assert_eq!(range.block_count(), 0);
}

#[test]
fn block_range_byte_math() {
    let range = BlockRange::new(2, 5);
    assert_eq!(range.byte_offset(), Some(2 * BLOCK_SIZE));
    assert_eq!(range.byte_len(), Some(3 * BLOCK_SIZE));
    assert_eq!(BlockRange::new(u64::MAX, u64::MAX).byte_offset(), None);
}

#[test]
fn parse_version_one() {
    let list = TransferList::parse_str("1\n1\nnew 2,0,1\n").unwrap();
    assert_eq!(list.version, 1);
    assert_eq!(list.declared_new_blocks, 1);
    assert_eq!(list.platform(), Platform::Lollipop50);
    assert_eq!(list.commands, vec![Command::New(ranges(&[(0, 1)]))]);
}

#[test]
fn version_one_has_no_stash_header() {
    // The third and fourth lines are commands here, not stash counts.
    let list = TransferList::parse_str("1\n2\nerase 2,0,2\nnew 2,0,2\n").unwrap();
    assert_eq!(
        list.commands,
        vec![
            Command::Erase(ranges(&[(0, 2)])),
            Command::New(ranges(&[(0, 2)])),
        ]
    );
}

#[test]
fn parse_version_two_skips_stash_lines() {
    let src = "2\n1\n0\n0\nnew 2,0,1\nerase 2,5,6\n";
    let list = TransferList::parse_str(src).unwrap();
    assert_eq!(list.platform(), Platform::Lollipop51);
    assert_eq!(
        list.commands,
        vec![
            Command::New(ranges(&[(0, 1)])),
            Command::Erase(ranges(&[(5, 6)])),
        ]
    );
    assert_eq!(list.max_block_end(), 6);
    assert_eq!(list.new_block_count(), 1);
}

#[test]
fn parse_skips_unsupported_commands() {
    let src = "\
4
12
2
10
erase 2,20,30
stash 1234abcd 2,0,2
move 1234abcd 2,0,2 2 2,4,6
zero 2,30,32

new 4,0,2,6,8
free 1234abcd
";
    let list = TransferList::parse_str(src).unwrap();
    assert_eq!(list.platform(), Platform::NougatOreo);
    assert_eq!(
        list.commands.iter().map(Command::kind).collect::<Vec<_>>(),
        vec![CommandKind::Erase, CommandKind::Zero, CommandKind::New]
    );
    assert_eq!(list.commands[2].ranges(), &ranges(&[(0, 2), (6, 8)]));
    assert_eq!(list.max_block_end(), 32);
}

#[test]
fn digit_leading_line_is_unknown_command() {
    let err = TransferList::parse_str("1\n1\nnew 2,0,1\n42 2,0,1\n").unwrap_err();
    assert!(matches!(
        err,
        ParseError::UnknownCommand { line: 4, ref command } if command == "42"
    ));
}

#[test]
fn malformed_rangeset_reports_line() {
    let err = TransferList::parse_str("2\n1\n0\n0\nnew 2,0,1\nzero 3,0,1\nnew 2,1,2\n")
        .unwrap_err();
    assert!(matches!(
        err,
        ParseError::MalformedRangeSet {
            line: 6,
            source: RangeSetError::CountMismatch { .. }
        }
    ));
}

#[test]
fn command_without_rangeset_is_malformed() {
    let err = TransferList::parse_str("1\n1\nnew\n").unwrap_err();
    assert!(matches!(
        err,
        ParseError::MalformedRangeSet {
            line: 3,
            source: RangeSetError::Empty
        }
    ));
}

#[test]
fn command_names_are_case_sensitive() {
    let list = TransferList::parse_str("1\n1\nNEW 2,0,1\n").unwrap();
    assert!(list.commands.is_empty());
}

#[test]
fn non_numeric_version_fails() {
    let err = TransferList::parse_str("four\n1\n").unwrap_err();
    assert!(matches!(
        err,
        ParseError::InvalidHeader { field: HeaderField::Version, ref value } if value == "four"
    ));
}

#[test]
fn missing_header_lines_fail() {
    assert!(matches!(
        TransferList::parse_str(""),
        Err(ParseError::MissingHeader(HeaderField::Version))
    ));
    assert!(matches!(
        TransferList::parse_str("3\n"),
        Err(ParseError::MissingHeader(HeaderField::NewBlocks))
    ));
}

#[test]
fn truncated_stash_header_is_tolerated() {
    let list = TransferList::parse_str("3\n0\n").unwrap();
    assert_eq!(list.version, 3);
    assert!(list.commands.is_empty());
    assert_eq!(list.max_block_end(), 0);
}

#[test]
fn unknown_version_uses_stash_header() {
    let list = TransferList::parse_str("9\n1\n7\n7\nnew 2,0,1\n").unwrap();
    assert_eq!(list.platform(), Platform::Unknown);
    assert_eq!(list.commands, vec![Command::New(ranges(&[(0, 1)]))]);
}

#[test]
fn crlf_line_endings() {
    let list = TransferList::parse_str("1\r\n1\r\nnew 2,0,1\r\n").unwrap();
    assert_eq!(list.commands, vec![Command::New(ranges(&[(0, 1)]))]);
}

#[test]
fn platform_labels() {
    assert_eq!(Platform::from_version(1).to_string(), "Android Lollipop 5.0");
    assert_eq!(Platform::from_version(2).to_string(), "Android Lollipop 5.1");
    assert_eq!(Platform::from_version(3).to_string(), "Android Marshmallow 6.x");
    assert_eq!(
        Platform::from_version(4).to_string(),
        "Android Nougat 7.x / Oreo 8.x"
    );
    assert_eq!(Platform::from_version(0), Platform::Unknown);
    assert!(Platform::from_version(0).has_stash_header());
}

#[test]
fn error_messages() {
    let err = ParseError::UnknownCommand {
        line: 7,
        command: "12".to_owned(),
    };
    assert_eq!(err.to_string(), "Unknown command `12` on line 7");
    let err = ParseError::MissingHeader(HeaderField::NewBlocks);
    assert!(err.to_string().contains("total new blocks"));
}
