use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Days, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::startup::AppState;
use service_core::error::AppError;

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Default, Serialize)]
pub struct SentimentBuckets {
    #[serde(rename = "POSITIVE")]
    pub positive: i64,
    #[serde(rename = "NEGATIVE")]
    pub negative: i64,
    #[serde(rename = "NEUTRAL")]
    pub neutral: i64,
}

#[derive(Debug, Serialize)]
pub struct QueryRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub query_range: QueryRange,
    pub daily_counts: BTreeMap<NaiveDate, SentimentBuckets>,
}

/// Per-day sentiment counts over an inclusive date range.
#[tracing::instrument(skip(state))]
pub async fn sentiment_analytics(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    if query.end_date < query.start_date {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "end_date must not precede start_date"
        )));
    }

    let start = query
        .start_date
        .and_time(NaiveTime::MIN)
        .and_utc();
    // inclusive end date: query strictly before the following midnight
    let end = query
        .end_date
        .checked_add_days(Days::new(1))
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("end_date out of range")))?
        .and_time(NaiveTime::MIN)
        .and_utc();

    let counts = state.db.sentiment_counts(start, end).await?;

    let mut daily_counts: BTreeMap<NaiveDate, SentimentBuckets> = BTreeMap::new();
    for row in counts {
        let buckets = daily_counts.entry(row.day).or_default();
        match row.sentiment.as_str() {
            "POSITIVE" => buckets.positive = row.count,
            "NEGATIVE" => buckets.negative = row.count,
            "NEUTRAL" => buckets.neutral = row.count,
            other => {
                tracing::warn!(sentiment = other, "unexpected sentiment label in store");
            }
        }
    }

    Ok(Json(AnalyticsResponse {
        query_range: QueryRange {
            start_date: query.start_date,
            end_date: query.end_date,
        },
        daily_counts,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_serialize_with_uppercase_labels() {
        let buckets = SentimentBuckets {
            positive: 2,
            negative: 1,
            neutral: 0,
        };
        let json = serde_json::to_value(&buckets).unwrap();
        assert_eq!(json["POSITIVE"], 2);
        assert_eq!(json["NEGATIVE"], 1);
        assert_eq!(json["NEUTRAL"], 0);
    }
}
