//! Capability detection for the installed ffmpeg build. The tier is the
//! numeric major version from the first line of `ffmpeg -version`;
//! unversioned development builds (an `N-…` revision tag) and every
//! probe failure map to tier 0, which selects the compatibility
//! filter-graph strategy.

use std::process::Command;
use std::time::Duration;

use crate::exec::{self, Outcome};

/// Minimum tier with a usable `zoompan` filter.
pub const KEN_BURNS_MIN_TIER: u32 = 4;

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// First line of the tool's version banner. `Err` only when the binary
/// cannot be spawned at all; a timeout or empty output yields an empty
/// line (and therefore tier 0 downstream).
pub fn version_banner(tool_path: &str) -> std::io::Result<String> {
    let mut cmd = Command::new(tool_path);
    cmd.arg("-version");
    match exec::run(cmd, PROBE_TIMEOUT)? {
        Outcome::Exited { stdout, stderr, .. } => {
            let text = if stdout.trim().is_empty() { stderr } else { stdout };
            Ok(text.lines().next().unwrap_or_default().to_string())
        }
        Outcome::TimedOut { .. } => Ok(String::new()),
    }
}

/// Capability tier of the tool at `tool_path`. Never errors: any
/// invocation failure means "use the compatibility strategy".
pub fn detect_tier(tool_path: &str) -> u32 {
    version_banner(tool_path)
        .map(|line| parse_tier(&line))
        .unwrap_or(0)
}

/// Extract the major version from a banner line such as
/// `ffmpeg version 6.1.1 Copyright …`. A bare revision identifier with
/// no leading numeral (`N-55702-g920046a`) is a development build and
/// maps to 0 regardless of how recent it is.
pub fn parse_tier(banner: &str) -> u32 {
    let mut words = banner.split_whitespace();
    while let Some(word) = words.next() {
        if word == "version" {
            let Some(version) = words.next() else {
                return 0;
            };
            let digits: String = version
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            return digits.parse().unwrap_or(0);
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_release_versions_parse_to_their_major() {
        assert_eq!(
            parse_tier("ffmpeg version 6.1.1 Copyright (c) 2000-2023 the FFmpeg developers"),
            6
        );
        assert_eq!(parse_tier("ffmpeg version 4.4.2-0ubuntu0.22.04.1"), 4);
        assert_eq!(parse_tier("ffmpeg version 2.8.17"), 2);
    }

    #[test]
    fn development_build_tags_are_tier_zero() {
        assert_eq!(
            parse_tier("ffmpeg version N-55702-g920046a Copyright (c) 2000-2013"),
            0
        );
    }

    #[test]
    fn garbage_banners_are_tier_zero() {
        assert_eq!(parse_tier(""), 0);
        assert_eq!(parse_tier("no banner here"), 0);
        assert_eq!(parse_tier("ffmpeg version"), 0);
        assert_eq!(parse_tier("ffmpeg version vNext"), 0);
    }

    #[test]
    fn unreachable_binary_is_tier_zero() {
        assert_eq!(detect_tier("/definitely/not/a/real/ffmpeg"), 0);
    }
}
