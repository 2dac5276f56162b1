use serde::Serialize;

/// Adherence summary over one user's meal history.
///
/// Built from the `in_diet` flags ordered by ascending meal time.
/// `total == inside + outside` always holds, and `best_streak` is the length
/// of the longest contiguous run of in-diet meals in that order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub total: u64,
    pub inside: u64,
    pub outside: u64,
    pub best_streak: u64,
}

impl Metrics {
    /// Single pass. An empty history yields all zeros.
    pub fn from_flags<I>(flags: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        let mut metrics = Metrics::default();
        let mut current = 0u64;

        for in_diet in flags {
            metrics.total += 1;
            if in_diet {
                metrics.inside += 1;
                current += 1;
            } else {
                metrics.outside += 1;
                current = 0;
            }
            metrics.best_streak = metrics.best_streak.max(current);
        }

        metrics
    }
}
