//! Fetch every catalog series and join them into one date-indexed table.

use chrono::NaiveDate;
use tracing::info;

use crate::domain::{Observation, SeriesCatalog, TimeTable};
use crate::error::AppError;

/// Anything that can return observations for a provider series id.
pub trait SeriesSource {
    fn fetch_series(
        &self,
        series_id: &str,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Observation>, AppError>;
}

/// Download each catalog series and outer-join them on date.
///
/// Columns follow catalog order. The first failing series aborts the whole
/// download; no partial table is returned. A series with no observed values in
/// `[start, end]` (nothing at all, or only missing placeholders) is a retrieval
/// error.
pub fn download_series<S: SeriesSource + ?Sized>(
    source: &S,
    catalog: &SeriesCatalog,
    start: NaiveDate,
    end: Option<NaiveDate>,
) -> Result<TimeTable, AppError> {
    let mut series = Vec::with_capacity(catalog.len());

    for entry in catalog.entries() {
        let observations: Vec<Observation> = source
            .fetch_series(&entry.series_id, start, end)?
            .into_iter()
            .filter(|obs| obs.date >= start && end.is_none_or(|e| obs.date <= e))
            .collect();

        if observations.is_empty() {
            return Err(AppError::retrieval(
                &entry.series_id,
                "no observations returned for the requested date range",
            ));
        }
        if observations.iter().all(|obs| obs.value.is_none()) {
            return Err(AppError::retrieval(
                &entry.series_id,
                "every observation in the requested date range is missing",
            ));
        }

        info!(
            name = %entry.name,
            series_id = %entry.series_id,
            observations = observations.len(),
            "fetched series"
        );
        series.push((entry.name.clone(), observations));
    }

    Ok(TimeTable::from_series(series))
}
