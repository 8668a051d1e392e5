//! Format resolution: which qualities to offer, and which rendition to hand out.
//!
//! Both functions are pure. A format is only considered when it carries a
//! video stream, reports a height and uses the preferred container.

use crate::download::source::RawFormat;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Container the resolver hands out; plays everywhere without remuxing.
pub const PREFERRED_CONTAINER: &str = "mp4";

/// Quality menu returned when the extractor reports nothing usable.
pub const FALLBACK_QUALITIES: [&str; 4] = ["360", "480", "720", "1080"];

/// Height of a format that may be enumerated or selected.
fn eligible_height(format: &RawFormat) -> Option<u32> {
    if !format.has_video || !format.container.eq_ignore_ascii_case(PREFERRED_CONTAINER) {
        return None;
    }
    format.height
}

/// Distinct heights of eligible formats, ascending, as strings.
///
/// Falls back to [`FALLBACK_QUALITIES`] when no format is eligible.
pub fn enumerate_qualities(formats: &[RawFormat]) -> Vec<String> {
    let heights: BTreeSet<u32> = formats
        .iter()
        .filter_map(eligible_height)
        .collect();

    if heights.is_empty() {
        return FALLBACK_QUALITIES.iter().map(|q| q.to_string()).collect();
    }

    heights.into_iter().map(|h| h.to_string()).collect()
}

/// Best eligible format whose height does not exceed `ceiling`.
///
/// Ties on height go to the larger known size; a known size beats an unknown
/// one. Remaining ties keep the format listed first.
pub fn select_format(formats: &[RawFormat], ceiling: u32) -> Option<&RawFormat> {
    let mut best: Option<(u32, &RawFormat)> = None;
    for format in formats {
        let Some(height) = eligible_height(format).filter(|h| *h <= ceiling) else {
            continue;
        };
        let replace = match best {
            Some((best_height, current)) => compare(height, format, best_height, current) == Ordering::Greater,
            None => true,
        };
        if replace {
            best = Some((height, format));
        }
    }
    best.map(|(_, format)| format)
}

fn compare(height: u32, format: &RawFormat, other_height: u32, other: &RawFormat) -> Ordering {
    height
        .cmp(&other_height)
        .then_with(|| format.size_bytes.cmp(&other.size_bytes))
}

/// Parses a requested quality such as `"720"` or `"720p"` into a height ceiling.
pub fn parse_quality(quality: &str) -> Option<u32> {
    let trimmed = quality.trim();
    let digits = trimmed
        .strip_suffix('p')
        .or_else(|| trimmed.strip_suffix('P'))
        .unwrap_or(trimmed);
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fmt(height: Option<u32>, container: &str, has_video: bool, size: Option<u64>) -> RawFormat {
        RawFormat {
            height,
            container: container.to_string(),
            has_video,
            url: format!("https://cdn.example.com/{}-{:?}-{:?}", container, height, size),
            size_bytes: size,
        }
    }

    fn mp4(height: u32) -> RawFormat {
        fmt(Some(height), "mp4", true, None)
    }

    #[test]
    fn test_enumerate_dedups_and_sorts_numerically() {
        let formats = vec![mp4(1080), mp4(480), mp4(720), mp4(480), mp4(1080)];
        assert_eq!(enumerate_qualities(&formats), vec!["480", "720", "1080"]);
    }

    #[test]
    fn test_enumerate_skips_non_video_non_mp4_and_missing_height() {
        let formats = vec![
            fmt(Some(720), "webm", true, None),
            fmt(Some(480), "mp4", false, None),
            fmt(None, "mp4", true, None),
            mp4(360),
        ];
        assert_eq!(enumerate_qualities(&formats), vec!["360"]);
    }

    #[test]
    fn test_enumerate_lists_every_eligible_height() {
        let formats = vec![mp4(4320), mp4(144), mp4(720), mp4(240)];
        assert_eq!(enumerate_qualities(&formats), vec!["144", "240", "720", "4320"]);
    }

    #[test]
    fn test_enumerate_agrees_with_select() {
        let low_only = vec![mp4(144), mp4(240)];
        let listed = enumerate_qualities(&low_only);
        assert_eq!(listed, vec!["144", "240"]);
        for quality in &listed {
            let ceiling = parse_quality(quality).unwrap();
            assert_eq!(select_format(&low_only, ceiling).and_then(|f| f.height), Some(ceiling));
        }
    }

    #[test]
    fn test_enumerate_fallback() {
        assert_eq!(enumerate_qualities(&[]), vec!["360", "480", "720", "1080"]);
        let audio_only = vec![fmt(Some(1080), "mp4", false, None)];
        assert_eq!(enumerate_qualities(&audio_only), vec!["360", "480", "720", "1080"]);
    }

    #[test]
    fn test_select_scenario_ceiling_720() {
        let formats = vec![mp4(360), mp4(720), mp4(1080)];
        assert_eq!(select_format(&formats, 720).and_then(|f| f.height), Some(720));
    }

    #[test]
    fn test_select_scenario_ceiling_480() {
        let formats = vec![mp4(360), mp4(720), mp4(1080)];
        assert_eq!(select_format(&formats, 480).and_then(|f| f.height), Some(360));
    }

    #[test]
    fn test_select_audio_only_not_found() {
        let formats = vec![fmt(Some(1080), "mp4", false, None)];
        assert_eq!(select_format(&formats, 2160), None);
        assert_eq!(select_format(&formats, 0), None);
    }

    #[test]
    fn test_select_ceiling_below_all() {
        let formats = vec![mp4(720), mp4(1080)];
        assert_eq!(select_format(&formats, 480), None);
    }

    #[test]
    fn test_select_ignores_other_containers() {
        let formats = vec![fmt(Some(720), "webm", true, None), mp4(480)];
        assert_eq!(select_format(&formats, 720).and_then(|f| f.height), Some(480));
    }

    #[test]
    fn test_select_tie_prefers_larger_size() {
        let formats = vec![
            fmt(Some(720), "mp4", true, Some(10)),
            fmt(Some(720), "mp4", true, None),
            fmt(Some(720), "mp4", true, Some(30)),
            fmt(Some(720), "mp4", true, Some(20)),
        ];
        let selected = select_format(&formats, 720).unwrap();
        assert_eq!(selected.size_bytes, Some(30));
    }

    #[test]
    fn test_select_tie_keeps_first_listed() {
        let mut first = mp4(720);
        first.url = "https://cdn.example.com/first".to_string();
        let mut second = mp4(720);
        second.url = "https://cdn.example.com/second".to_string();
        let formats = vec![mp4(360), first, second];
        assert_eq!(select_format(&formats, 1080).unwrap().url, "https://cdn.example.com/first");
    }

    #[test]
    fn test_select_properties_over_ceilings() {
        let formats = vec![
            mp4(144),
            mp4(360),
            fmt(Some(480), "webm", true, None),
            mp4(720),
            fmt(None, "mp4", true, None),
            fmt(Some(1440), "mp4", false, None),
            mp4(1080),
        ];
        let eligible: Vec<u32> = vec![144, 360, 720, 1080];
        for ceiling in [0, 100, 144, 300, 360, 479, 480, 720, 1000, 1080, 5000] {
            let expected = eligible.iter().copied().filter(|h| *h <= ceiling).max();
            let selected = select_format(&formats, ceiling).and_then(|f| f.height);
            assert_eq!(selected, expected, "ceiling {}", ceiling);
        }
    }

    #[test]
    fn test_parse_quality() {
        assert_eq!(parse_quality("720"), Some(720));
        assert_eq!(parse_quality("1080p"), Some(1080));
        assert_eq!(parse_quality(" 480 "), Some(480));
        assert_eq!(parse_quality("best"), None);
        assert_eq!(parse_quality(""), None);
        assert_eq!(parse_quality("-1"), None);
    }
}
