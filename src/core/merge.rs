use crate::core::{error::FetchResult, span::TimeSpan};

/// Combine partial results of one logical fetch into a single result.
///
/// Any error poisons the whole result. Otherwise, the non-empty lines are sorted
/// chronologically and concatenated, dropping points that overlap the running tail.
///
/// # Panics
///
/// Panics on empty input.
pub fn combine(results: Vec<FetchResult>) -> FetchResult {
    assert!(!results.is_empty(), "there must be at least one result to combine");

    let mut lines = results.into_iter().collect::<Result<Vec<_>, _>>()?;
    if lines.len() == 1 {
        return Ok(lines.swap_remove(0));
    }

    let mut merged = lines[0].empty_like();
    if let Some(time_span) = lines.iter().map(|line| line.time_span).reduce(TimeSpan::union) {
        merged.time_span = time_span;
    }

    lines.retain(|line| !line.points.is_empty());
    lines.sort_by_key(|line| line.points.first().map(|point| point.timestamp));
    for line in &lines {
        merged.append_newer(&line.points);
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Local};

    use super::*;
    use crate::core::{
        error::FetchError,
        line::tests::{at, line},
    };

    fn timestamps(result: FetchResult) -> Vec<DateTime<Local>> {
        result.unwrap().points.iter().map(|point| point.timestamp).collect()
    }

    #[test]
    fn test_singleton_is_identity() {
        let single = line(&[1, 3]);
        assert_eq!(combine(vec![Ok(single.clone())]), Ok(single));
    }

    #[test]
    fn test_singleton_error() {
        assert_eq!(
            combine(vec![Err(FetchError::ServerMaintenance)]),
            Err(FetchError::ServerMaintenance)
        );
    }

    #[test]
    fn test_error_poisons_result() {
        let results = vec![Ok(line(&[0, 1])), Err(FetchError::TooLargeTimeSpan), Ok(line(&[2]))];
        assert_eq!(combine(results), Err(FetchError::TooLargeTimeSpan));
    }

    #[test]
    fn test_shared_boundary_is_not_duplicated() {
        let merged = combine(vec![Ok(line(&[0, 1, 2])), Ok(line(&[2, 3, 4]))]);
        assert_eq!(timestamps(merged), [at(0), at(1), at(2), at(3), at(4)]);
    }

    #[test]
    fn test_partials_are_sorted() {
        let merged = combine(vec![Ok(line(&[6, 7])), Ok(line(&[0, 1])), Ok(line(&[3, 4]))]);
        assert_eq!(timestamps(merged), [at(0), at(1), at(3), at(4), at(6), at(7)]);
    }

    #[test]
    fn test_overlap_is_trimmed() {
        let merged = combine(vec![Ok(line(&[0, 1, 2, 3])), Ok(line(&[1, 2, 3, 4, 5]))]);
        assert_eq!(timestamps(merged), [at(0), at(1), at(2), at(3), at(4), at(5)]);
    }

    #[test]
    fn test_empty_partials_are_dropped() {
        let merged = combine(vec![Ok(line(&[0, 1])), Ok(line(&[])), Ok(line(&[2]))]).unwrap();
        assert_eq!(merged.points.len(), 3);
        assert_eq!(merged.time_span, TimeSpan::new(at(0), at(2)));
    }

    #[test]
    fn test_all_empty() {
        let merged = combine(vec![Ok(line(&[])), Ok(line(&[]))]).unwrap();
        assert!(merged.points.is_empty());
    }

    #[test]
    #[should_panic = "at least one"]
    fn test_empty_input() {
        let _ = combine(Vec::new());
    }
}
