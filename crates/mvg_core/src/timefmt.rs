use chrono::{DateTime, FixedOffset, Local, Offset, Timelike, Utc};

use crate::{Language, TimeFormat};

/// The instant and UTC offset one render pass formats times against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    pub now: DateTime<Utc>,
    pub offset: FixedOffset,
}

impl RenderContext {
    pub fn new(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        RenderContext { now, offset }
    }

    /// Context for the current instant in the host's local offset.
    pub fn local_now() -> Self {
        let now = Utc::now();
        let offset = now.with_timezone(&Local).offset().fix();
        RenderContext { now, offset }
    }
}

/// Labels used for relative times.
struct Labels {
    now: &'static str,
    r#in: &'static str,
    min: &'static str,
}

fn labels(language: Language) -> Labels {
    match language {
        Language::En => Labels {
            now: "now",
            r#in: "in",
            min: "min",
        },
        Language::De => Labels {
            now: "jetzt",
            r#in: "in",
            min: "min",
        },
    }
}

/// Zero-padded 24-hour `HH:MM` of `instant` in the context offset.
pub fn absolute_time(instant: DateTime<Utc>, ctx: &RenderContext) -> String {
    let local = instant.with_timezone(&ctx.offset);
    format!("{:02}:{:02}", local.hour(), local.minute())
}

/// Whole minutes until `instant`, floored.
pub fn minutes_until(instant: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (instant - now).num_milliseconds().div_euclid(60_000)
}

/// "now" when the instant is not in the future, "in N min" otherwise.
pub fn relative_time(instant: DateTime<Utc>, ctx: &RenderContext, language: Language) -> String {
    let labels = labels(language);
    let minutes = minutes_until(instant, ctx.now);
    if minutes <= 0 {
        labels.now.to_string()
    } else {
        format!("{} {} {}", labels.r#in, minutes, labels.min)
    }
}

pub fn format_time(
    instant: DateTime<Utc>,
    format: TimeFormat,
    ctx: &RenderContext,
    language: Language,
) -> String {
    match format {
        TimeFormat::Absolute => absolute_time(instant, ctx),
        TimeFormat::Relative => relative_time(instant, ctx, language),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn ctx() -> RenderContext {
        RenderContext::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 8, 5, 30).unwrap(),
            FixedOffset::east_opt(0).unwrap(),
        )
    }

    #[test]
    fn test_absolute_time_is_zero_padded() {
        let ctx = ctx();
        assert_eq!(absolute_time(ctx.now, &ctx), "08:05");

        let berlin = RenderContext::new(ctx.now, FixedOffset::east_opt(3600).unwrap());
        assert_eq!(absolute_time(ctx.now, &berlin), "09:05");

        let late = Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 0).unwrap();
        assert_eq!(absolute_time(late, &berlin), "00:59");
    }

    #[test]
    fn test_relative_time_in_future() {
        let ctx = ctx();
        let instant = ctx.now + Duration::minutes(5);
        assert_eq!(relative_time(instant, &ctx, Language::En), "in 5 min");
        assert_eq!(relative_time(instant, &ctx, Language::De), "in 5 min");
    }

    #[test]
    fn test_relative_time_is_floored() {
        let ctx = ctx();
        let instant = ctx.now + Duration::seconds(119);
        assert_eq!(relative_time(instant, &ctx, Language::En), "in 1 min");
        assert_eq!(minutes_until(ctx.now - Duration::seconds(1), ctx.now), -1);
    }

    #[test]
    fn test_relative_time_now_or_past() {
        let ctx = ctx();
        assert_eq!(relative_time(ctx.now, &ctx, Language::En), "now");
        assert_eq!(
            relative_time(ctx.now + Duration::seconds(59), &ctx, Language::En),
            "now"
        );
        assert_eq!(
            relative_time(ctx.now - Duration::minutes(3), &ctx, Language::De),
            "jetzt"
        );
    }

    #[test]
    fn test_format_time_dispatch() {
        let ctx = ctx();
        let instant = ctx.now + Duration::minutes(10);
        assert_eq!(
            format_time(instant, TimeFormat::Absolute, &ctx, Language::En),
            "08:15"
        );
        assert_eq!(
            format_time(instant, TimeFormat::Relative, &ctx, Language::En),
            "in 10 min"
        );
    }
}
