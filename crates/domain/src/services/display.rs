//! Human-readable rating output for themes and widgets.

use serde::{Deserialize, Serialize};

use crate::models::AggregateRecord;
use shared::text::{escape_html, format_number, round_to};

/// CSS class of the badge wrapper when none is given.
pub const DEFAULT_BADGE_CLASS: &str = "aggregate-rating";

const STAR_SLOTS: u32 = 5;

/// Which parts of the rating a badge shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeStyle {
    #[default]
    All,
    Rating,
    Count,
    Stars,
}

/// Scale a rating is formatted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingFormat {
    #[default]
    Percentage,
    /// 1-10 scale.
    Decimal,
    /// 1-5 scale.
    Stars,
    /// The stored mean, unrounded.
    Raw,
}

/// The mean in every display scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedRatings {
    pub percentage: String,
    pub decimal: String,
    pub stars: String,
    pub raw: String,
}

impl FormattedRatings {
    pub fn new(record: &AggregateRecord) -> Self {
        Self {
            percentage: format_rating(record, RatingFormat::Percentage),
            decimal: format_rating(record, RatingFormat::Decimal),
            stars: format_rating(record, RatingFormat::Stars),
            raw: format_rating(record, RatingFormat::Raw),
        }
    }
}

pub fn format_rating(record: &AggregateRecord, format: RatingFormat) -> String {
    let average = record.average_rating;
    match format {
        RatingFormat::Percentage => format!("{}%", format_number(round_to(average, 1))),
        RatingFormat::Decimal => format_number(round_to(average / 10.0, 1)),
        RatingFormat::Stars => format_number(round_to(average / 20.0, 1)),
        RatingFormat::Raw => format_number(average),
    }
}

/// Filled star slots for a 1-100 mean.
pub fn filled_stars(average: f64) -> u32 {
    (average / 20.0).round().clamp(0.0, STAR_SLOTS as f64) as u32
}

fn review_count_label(count: u64) -> String {
    if count == 1 {
        "1 review".to_string()
    } else {
        format!("{count} reviews")
    }
}

fn rating_span(record: &AggregateRecord) -> String {
    format!(
        "<span class=\"rating-value\">{}</span>",
        format_rating(record, RatingFormat::Percentage)
    )
}

fn count_span(record: &AggregateRecord) -> String {
    format!(
        "<span class=\"rating-count\">{}</span>",
        review_count_label(record.review_count)
    )
}

fn stars_span(record: &AggregateRecord) -> String {
    let filled = filled_stars(record.average_rating);
    let mut out = String::from("<span class=\"rating-stars\">");
    for slot in 1..=STAR_SLOTS {
        if slot <= filled {
            out.push_str("<span class=\"star filled\">★</span>");
        } else {
            out.push_str("<span class=\"star empty\">☆</span>");
        }
    }
    out.push_str("</span>");
    out
}

/// Renders the rating badge wrapped in a `<div>` with the given class.
pub fn render_badge(record: &AggregateRecord, style: BadgeStyle, class: &str) -> String {
    let body = match style {
        BadgeStyle::Rating => rating_span(record),
        BadgeStyle::Count => count_span(record),
        BadgeStyle::Stars => stars_span(record),
        BadgeStyle::All => format!(
            "{} <span class=\"rating-separator\">-</span> {}",
            rating_span(record),
            count_span(record)
        ),
    };
    format!("<div class=\"{}\">{}</div>", escape_html(class), body)
}
