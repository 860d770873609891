use std::collections::BTreeMap;

use crate::core::{data_type::DataType, line::DataLine};

/// Percentage of each production source's mean power in the sum of all the source means.
///
/// Lines of other data types and empty lines are ignored.
pub fn production_shares<'a>(
    lines: impl IntoIterator<Item = &'a DataLine>,
) -> BTreeMap<DataType, f64> {
    let means = lines
        .into_iter()
        .filter(|line| line.data_type.is_production_source())
        .filter_map(|line| Some((line.data_type, line.mean()?)))
        .collect::<BTreeMap<_, _>>();
    let total: f64 = means.values().sum();
    if total.abs() < f64::EPSILON {
        return BTreeMap::new();
    }
    means.into_iter().map(|(data_type, mean)| (data_type, mean / total * 100.0)).collect()
}
