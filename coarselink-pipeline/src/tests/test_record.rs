use crate::error::PipelineError;
use crate::record::RankingRecord;

#[test]
fn new_normalises_endpoint_order() {
    let record = RankingRecord::new(7, 2, 0.5);
    assert_eq!(record.source, 2);
    assert_eq!(record.target, 7);
}

#[test]
fn display_and_parse_round_trip() {
    let record = RankingRecord::new(3, 11, 0.125);
    let line = format!("{record}\n");
    assert_eq!(line, "3 11 0.125\n");
    let parsed = RankingRecord::parse_line(&line, 1).unwrap();
    assert_eq!(parsed, record);
}

#[test]
fn parse_accepts_plain_decimal_scores() {
    let parsed = RankingRecord::parse_line("0 1 0.900000\n", 1).unwrap();
    assert_eq!(parsed.source, 0);
    assert_eq!(parsed.target, 1);
    assert!((parsed.score - 0.9).abs() < 1e-12);
}

#[test]
fn parse_rejects_malformed_lines() {
    for line in ["", "1", "1 2", "a b c", "1 2 x", "1 2 3 4"] {
        assert!(
            matches!(
                RankingRecord::parse_line(line, 4),
                Err(PipelineError::MalformedRecord { line: 4, .. })
            ),
            "line {line:?} should be rejected"
        );
    }
}

#[test]
fn parse_rejects_unordered_pairs() {
    assert!(matches!(
        RankingRecord::parse_line("5 2 1.0\n", 1),
        Err(PipelineError::UnorderedRecord { src: 5, tgt: 2 })
    ));
    // Self-pairs are unordered too.
    assert!(matches!(
        RankingRecord::parse_line("3 3 1.0\n", 1),
        Err(PipelineError::UnorderedRecord { .. })
    ));
}
