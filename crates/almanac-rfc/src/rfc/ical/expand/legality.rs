//! BY-rule legality per frequency (RFC 5545 §3.3.10, RFC 7529 §4.1).

use almanac_core::config::ByRulePolicy;

use crate::rfc::ical::core::{ByRule, Frequency, Recurrence, is_leap_month};
use crate::rfc::ical::parse::{ParseError, ParseErrorKind, ParseResult};

/// How a BY-rule acts on the occurrence set of a frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Legality {
    /// Generates several candidates per period.
    Expand,
    /// Filters candidates.
    Contract,
    /// Not allowed with the frequency.
    Illegal,
}

/// ## Summary
/// Classifies `rule` under `freq` following the RFC 5545 table.
#[must_use]
pub const fn classify(rule: ByRule, freq: Frequency) -> Legality {
    use Frequency::{Daily, Hourly, Minutely, Monthly, Weekly, Yearly};
    use Legality::{Contract, Expand, Illegal};

    match (rule, freq) {
        (ByRule::Month | ByRule::WeekNo | ByRule::YearDay | ByRule::MonthDay | ByRule::Day, Yearly)
        | (ByRule::MonthDay | ByRule::Day, Monthly)
        | (ByRule::Day, Weekly)
        | (ByRule::Hour, Daily | Weekly | Monthly | Yearly)
        | (ByRule::Minute, Hourly | Daily | Weekly | Monthly | Yearly)
        | (ByRule::Second, Minutely | Hourly | Daily | Weekly | Monthly | Yearly) => Expand,
        (ByRule::WeekNo, _) | (ByRule::YearDay, Daily | Weekly | Monthly) | (ByRule::MonthDay, Weekly) => {
            Illegal
        }
        _ => Contract,
    }
}

fn violation(rule: &Recurrence, what: &str) -> ParseError {
    ParseError::new(ParseErrorKind::IllegalByRule, 0)
        .with_context(format!("{what} with FREQ={}", rule.freq))
}

/// ## Summary
/// Removes or rejects every BY-rule `rule` may not carry. BYDAY ordinals
/// are allowed only with MONTHLY, and with YEARLY when there is no
/// BYWEEKNO; leap months require RSCALE.
///
/// ## Errors
/// Under [`ByRulePolicy::Reject`], returns the first violation found.
pub fn enforce(rule: &mut Recurrence, policy: ByRulePolicy) -> ParseResult<()> {
    for by in ByRule::ALL {
        if rule.by(by).is_empty() || classify(by, rule.freq) != Legality::Illegal {
            continue;
        }
        match policy {
            ByRulePolicy::Reject => return Err(violation(rule, by.as_str())),
            ByRulePolicy::Drop => {
                tracing::warn!(by = by.as_str(), freq = %rule.freq, "Dropping BY-rule not allowed with frequency");
                rule.clear_by(by);
            }
        }
    }

    let ordinals_allowed = match rule.freq {
        Frequency::Monthly => true,
        Frequency::Yearly => rule.by_week_no.is_empty(),
        _ => false,
    };
    if rule.has_day_ordinals() && !ordinals_allowed {
        match policy {
            ByRulePolicy::Reject => return Err(violation(rule, "BYDAY ordinal")),
            ByRulePolicy::Drop => {
                tracing::warn!(freq = %rule.freq, "Dropping BYDAY with ordinals not allowed with frequency");
                rule.by_day.clear();
            }
        }
    }

    let has_leap = rule.by_month.as_slice().iter().any(|&m| is_leap_month(m));
    if has_leap && rule.rscale.is_none() {
        match policy {
            ByRulePolicy::Reject => return Err(violation(rule, "leap month without RSCALE")),
            ByRulePolicy::Drop => {
                tracing::warn!("Dropping BYMONTH with leap months outside RSCALE");
                rule.by_month.clear();
            }
        }
    }
    Ok(())
}
