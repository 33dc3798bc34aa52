/// Parse "MM:SS" into seconds
///
/// Returns `None` for anything that is not minutes, a colon and two-digit
/// seconds below 60.
pub fn parse_mmss(value: &str) -> Option<u32> {
    let (minutes, seconds) = value.trim().split_once(':')?;
    if minutes.is_empty() || seconds.len() != 2 {
        return None;
    }
    if !minutes.chars().all(|c| c.is_ascii_digit()) || !seconds.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }
    let minutes: u32 = minutes.parse().ok()?;
    let seconds: u32 = seconds.parse().ok()?;
    if seconds >= 60 {
        return None;
    }
    minutes.checked_mul(60)?.checked_add(seconds)
}

/// Ordering key for optional timestamps: missing or unparseable sorts last
pub fn sort_key(value: Option<&str>) -> u32 {
    value.and_then(parse_mmss).unwrap_or(u32::MAX)
}

/// True when `candidate` is strictly earlier than `current`
pub fn is_earlier(candidate: Option<&str>, current: Option<&str>) -> bool {
    sort_key(candidate) < sort_key(current)
}

/// Format seconds as zero-padded "MM:SS"
pub fn format_mmss(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Seconds of the leading `[MM:SS]` of a transcript line
pub fn line_timestamp(line: &str) -> Option<u32> {
    let rest = line.trim_start().strip_prefix('[')?;
    let (stamp, _) = rest.split_once(']')?;
    parse_mmss(stamp)
}

/// Last inline `[MM:SS]` anywhere in the transcript, in seconds
pub fn last_timestamp(transcript: &str) -> Option<u32> {
    transcript
        .split('[')
        .skip(1)
        .filter_map(|piece| {
            let (stamp, _) = piece.split_once(']')?;
            parse_mmss(stamp)
        })
        .last()
}

/// Timestamp of the last line that starts with `[MM:SS]`, 0 when none does
pub fn last_line_timestamp_seconds(transcript: &str) -> u32 {
    transcript
        .lines()
        .rev()
        .filter(|l| !l.trim().is_empty())
        .find_map(line_timestamp)
        .unwrap_or(0)
}

/// Lines whose leading timestamp falls in `[start, end)`, joined with newlines
///
/// Blank lines and lines without a parseable leading timestamp are skipped.
pub fn extract_segment_lines<'a, I>(lines: I, start: u32, end: u32) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .filter(|l| !l.trim().is_empty())
        .filter(|l| line_timestamp(l).is_some_and(|s| start <= s && s < end))
        .collect::<Vec<_>>()
        .join("\n")
}
