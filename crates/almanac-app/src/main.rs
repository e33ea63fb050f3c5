use almanac_core::config::load_config;
use almanac_core::logging;
use almanac_rfc::rfc::ical::core::{RecurOptions, Recurrence, Time};
use almanac_rfc::rfc::ical::expand::RecurIterator;
use anyhow::{Context, bail};

const DEFAULT_LIMIT: usize = 10;
const USAGE: &str = "usage: almanac <DTSTART> <RRULE> [LIMIT]";

fn main() -> anyhow::Result<()> {
    let settings = load_config()?;
    logging::init(&settings.logging)?;
    settings.apply();

    let mut args = std::env::args().skip(1);
    let (Some(start), Some(rule)) = (args.next(), args.next()) else {
        bail!(USAGE);
    };
    let limit = match args.next() {
        Some(raw) => raw
            .parse::<usize>()
            .with_context(|| format!("invalid limit {raw}"))?,
        None => DEFAULT_LIMIT,
    };

    let options = RecurOptions::from(&settings.recurrence);
    let dtstart: Time = start.parse()?;
    let rule = Recurrence::parse_with(&rule, &options)?;

    tracing::info!(rule = %rule, dtstart = %dtstart, limit, "Expanding recurrence");

    for occurrence in RecurIterator::with_options(&rule, dtstart, &options)?.take(limit) {
        println!("{occurrence}");
    }

    Ok(())
}
