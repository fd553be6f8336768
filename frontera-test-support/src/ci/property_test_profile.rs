//! Property-test run profile read from the environment.
//!
//! CI raises the case count for nightly runs and may ask for forked case
//! execution; local runs fall back to each suite's defaults.

use std::env;

/// Environment variable overriding the number of cases per property.
pub const PROGTEST_CASES_ENV_KEY: &str = "PROGTEST_CASES";
/// Environment variable asking proptest to run cases in forked processes.
pub const FRONTERA_PBT_FORK_ENV_KEY: &str = "FRONTERA_PBT_FORK";

/// Case count and fork mode for one property suite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
}

impl ProptestRunProfile {
    /// Reads the profile, keeping a default whenever its variable is unset
    /// or unparsable. Unparsable values are reported with `tracing::warn!`.
    ///
    /// # Examples
    ///
    /// ```
    /// use frontera_test_support::ci::property_test_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(32, false);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool) -> Self {
        Self {
            cases: overridden(PROGTEST_CASES_ENV_KEY, parse_cases).unwrap_or(default_cases),
            fork: overridden(FRONTERA_PBT_FORK_ENV_KEY, parse_switch).unwrap_or(default_fork),
        }
    }

    /// Cases to run per property.
    #[must_use]
    #[rustfmt::skip]
    pub fn cases(&self) -> u32 { self.cases }

    /// Whether cases run in forked subprocesses.
    #[must_use]
    #[rustfmt::skip]
    pub fn fork(&self) -> bool { self.fork }
}

fn overridden<T>(key: &'static str, parse: fn(&str) -> Result<T, &'static str>) -> Option<T> {
    let raw = env::var(key).ok()?;
    parse(raw.trim())
        .inspect_err(|reason| {
            tracing::warn!(env = key, raw = %raw, reason, "ignoring property-test override");
        })
        .ok()
}

fn parse_cases(raw: &str) -> Result<u32, &'static str> {
    match raw.parse::<u32>() {
        Ok(0) => Err("case count must be positive"),
        Ok(cases) => Ok(cases),
        Err(_) => Err("case count must be an unsigned integer"),
    }
}

fn parse_switch(raw: &str) -> Result<bool, &'static str> {
    if ["1", "true", "yes", "on"].iter().any(|word| raw.eq_ignore_ascii_case(word)) {
        Ok(true)
    } else if ["0", "false", "no", "off"].iter().any(|word| raw.eq_ignore_ascii_case(word)) {
        Ok(false)
    } else {
        Err("expected true/false, yes/no, on/off or 1/0")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use rstest::rstest;

    use super::*;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Runs `check` with both variables set as given, restoring them after.
    fn with_env(cases: Option<&str>, fork: Option<&str>, check: impl FnOnce()) {
        let _lock = ENV_LOCK.lock().expect("env lock");
        let saved: Vec<(&str, Option<String>)> = [PROGTEST_CASES_ENV_KEY, FRONTERA_PBT_FORK_ENV_KEY]
            .into_iter()
            .map(|key| (key, env::var(key).ok()))
            .collect();
        for (key, value) in [(PROGTEST_CASES_ENV_KEY, cases), (FRONTERA_PBT_FORK_ENV_KEY, fork)] {
            // SAFETY: every test touching these variables holds ENV_LOCK.
            unsafe {
                match value {
                    Some(value) => env::set_var(key, value),
                    None => env::remove_var(key),
                }
            }
        }
        check();
        for (key, value) in saved {
            // SAFETY: every test touching these variables holds ENV_LOCK.
            unsafe {
                match value {
                    Some(value) => env::set_var(key, value),
                    None => env::remove_var(key),
                }
            }
        }
    }

    #[test]
    fn unset_variables_keep_defaults() {
        with_env(None, None, || {
            assert_eq!(
                ProptestRunProfile::load(48, true),
                ProptestRunProfile { cases: 48, fork: true }
            );
        });
    }

    #[rstest]
    #[case::one("1", 1)]
    #[case::padded(" 250 ", 250)]
    #[case::large("25000", 25_000)]
    fn case_overrides_are_applied(#[case] raw: &str, #[case] expected: u32) {
        with_env(Some(raw), None, || {
            assert_eq!(ProptestRunProfile::load(64, false).cases(), expected);
        });
    }

    #[rstest]
    #[case::zero("0")]
    #[case::negative("-3")]
    #[case::word("many")]
    fn bad_case_overrides_fall_back(#[case] raw: &str) {
        with_env(Some(raw), None, || {
            assert_eq!(ProptestRunProfile::load(64, false).cases(), 64);
        });
    }

    #[rstest]
    #[case::yes("yes", true)]
    #[case::upper("ON", true)]
    #[case::digit("1", true)]
    #[case::no("no", false)]
    #[case::mixed("False", false)]
    #[case::zero("0", false)]
    fn fork_overrides_are_applied(#[case] raw: &str, #[case] expected: bool) {
        with_env(None, Some(raw), || {
            assert_eq!(ProptestRunProfile::load(64, !expected).fork(), expected);
        });
    }

    #[rstest]
    #[case::empty("")]
    #[case::unknown("sometimes")]
    #[case::two("2")]
    fn bad_fork_overrides_fall_back(#[case] raw: &str) {
        with_env(None, Some(raw), || {
            assert!(ProptestRunProfile::load(64, true).fork());
        });
    }
}
