/*!
 * Tests for TTML/ITT document generation
 */

use anyhow::Result;
use subtitler::itt::{IttEncoder, TTML_METADATA_NAMESPACE, TTML_NAMESPACE, TTML_STYLING_NAMESPACE};
use subtitler::subtitle_processor::{Cue, SrtParser};
use subtitler::timestamp::Timestamp;
use crate::common;

fn cue(index: usize, start_ms: u64, end_ms: u64, text: &str) -> Cue {
    Cue::new(index, Timestamp::from_millis(start_ms), Timestamp::from_millis(end_ms), text)
}

/// The document has an XML declaration and the tt > body > div > p tree
#[test]
fn test_encode_withCues_shouldBuildExpectedTree() -> Result<()> {
    let cues = vec![cue(1, 0, 1_200, "Hello"), cue(2, 1_200, 3_000, "World\nAgain")];

    let xml = IttEncoder::new().encode(&cues)?;

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<tt "));
    let (paths, paragraphs) = common::read_itt(&xml)?;
    assert_eq!(paths, vec!["tt", "tt>body", "tt>body>div", "tt>body>div>p", "tt>body>div>p"]);
    assert_eq!(paragraphs.len(), 2);
    assert_eq!(paragraphs[1].begin, "00:00:01.200");
    assert_eq!(paragraphs[1].end, "00:00:03.000");
    assert_eq!(paragraphs[1].text, "World Again");

    Ok(())
}

/// The root carries exactly the three TTML namespace declarations
#[test]
fn test_encode_withAnyCues_shouldDeclareNamespaces() -> Result<()> {
    let xml = IttEncoder::new().encode(&[cue(1, 0, 1, "x")])?;

    let root_line = xml.lines().nth(1).unwrap_or_default();
    assert_eq!(
        root_line,
        format!(
            "<tt xmlns=\"{}\" xmlns:tts=\"{}\" xmlns:ttm=\"{}\">",
            TTML_NAMESPACE, TTML_STYLING_NAMESPACE, TTML_METADATA_NAMESPACE
        )
    );
    assert_eq!(root_line.matches("xmlns").count(), 3);

    Ok(())
}

/// Paragraph order follows cue order
#[test]
fn test_encode_withManyCues_shouldPreserveOrder() -> Result<()> {
    let cues: Vec<Cue> = (0..50u64)
        .map(|i| cue(i as usize + 1, i * 1_000, i * 1_000 + 900, &format!("line {}", i)))
        .collect();

    let (_, paragraphs) = common::read_itt(&IttEncoder::new().encode(&cues)?)?;

    for (i, p) in paragraphs.iter().enumerate() {
        assert_eq!(p.text, format!("line {}", i));
        assert_eq!(p.begin, Timestamp::from_millis(i as u64 * 1_000).to_ttml_string());
    }

    Ok(())
}

/// Each nesting level is indented by two spaces
#[test]
fn test_encode_withDefaultIndent_shouldUseTwoSpaces() -> Result<()> {
    let xml = IttEncoder::new().encode(&[cue(1, 0, 500, "a")])?;

    assert!(xml.contains("\n  <body>\n"));
    assert!(xml.contains("\n    <div>\n"));
    assert!(xml.contains("\n      <p begin=\"00:00:00.000\" end=\"00:00:00.500\">a</p>\n"));
    assert!(xml.ends_with("</tt>\n"));

    Ok(())
}

/// Markup characters in text survive a read back
#[test]
fn test_encode_withSpecialCharacters_shouldEscapeAndRoundTrip() -> Result<()> {
    let xml = IttEncoder::new().encode(&[cue(1, 0, 500, "<i>R&D</i> \"quoted\"")])?;

    assert!(!xml.contains("<i>"));
    let (_, paragraphs) = common::read_itt(&xml)?;
    assert_eq!(paragraphs[0].text, "<i>R&D</i> \"quoted\"");

    Ok(())
}

/// An empty cue list still produces a complete document
#[test]
fn test_encode_withNoCues_shouldProduceEmptyDiv() -> Result<()> {
    let xml = IttEncoder::new().encode(&[])?;
    let (paths, paragraphs) = common::read_itt(&xml)?;

    assert_eq!(paths, vec!["tt", "tt>body", "tt>body>div"]);
    assert!(paragraphs.is_empty());

    Ok(())
}

/// begin/end keep the digits of the source SRT, only the separator changes
#[test]
fn test_encode_withParsedWideHours_shouldKeepSourceDigits() -> Result<()> {
    let cues = SrtParser::parse("1\n000:00:01,000 --> 000:00:02,500\nWide\n")?;

    let xml = IttEncoder::new().encode(&cues)?;
    let (_, paragraphs) = common::read_itt(&xml)?;

    assert_eq!(paragraphs[0].begin, "000:00:01.000");
    assert_eq!(paragraphs[0].end, "000:00:02.500");

    Ok(())
}
