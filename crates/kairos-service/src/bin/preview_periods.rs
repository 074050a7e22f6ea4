use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use kairos_core::config::load_config;
use kairos_core::logging::{apply_log_level, init_tracing};
use kairos_rfc::rfc::timezone::TimeZoneResolver;
use kairos_service::schedule::{PeriodExpander, ScheduleRequest};

const USAGE: &str =
    "usage: preview_periods [--json] <start-rfc3339> <end-rfc3339> <duration-ms> <rrule> [tzid]";

fn main() -> anyhow::Result<()> {
    let filter_handle = init_tracing()?;
    let config = load_config()?;
    apply_log_level(&filter_handle, &config.logging);

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let json = if let Some(pos) = args.iter().position(|arg| arg == "--json") {
        args.remove(pos);
        true
    } else {
        false
    };

    let [start, end, duration_ms, rrule, rest @ ..] = args.as_slice() else {
        bail!(USAGE);
    };
    if rest.len() > 1 {
        bail!(USAGE);
    }

    let request = ScheduleRequest {
        start: parse_instant(start)?,
        end: parse_instant(end)?,
        duration_ms: duration_ms
            .parse()
            .with_context(|| format!("invalid duration '{duration_ms}'"))?,
        rrule: rrule.clone(),
        timezone: rest.first().cloned(),
    };

    let expander = PeriodExpander::new(&config.scheduler);
    let mut resolver = TimeZoneResolver::new();
    let periods = expander.expand_request(&request, &mut resolver)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&periods)?);
    } else {
        for period in &periods {
            println!("{period}");
        }
    }

    Ok(())
}

fn parse_instant(value: &str) -> anyhow::Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("invalid RFC 3339 timestamp '{value}'"))?;
    Ok(parsed.with_timezone(&Utc))
}
